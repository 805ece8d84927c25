use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;

use super::{
    advisory_for, plan_medication_reminders, PassReport, ReminderAction, ReminderRunner,
    ReminderSchedule, WeatherAdvisory, WeatherError, WeatherProvider,
};
use crate::workflows::journal::{
    ActivitySession, ClockTime, DoseRecord, GlucoseReading, JournalRepository, MealEntry,
    Medication, NewMedication, RecordId,
};
use crate::workflows::subjects::{NotificationKind, RepositoryError, SubjectId};
use crate::workflows::testing::{at, date, subject_record, MemoryJournal, MemorySubjects};

fn clock(hour: u32, minute: u32) -> ClockTime {
    ClockTime::from_hm(hour, minute).expect("valid time")
}

fn local(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    at(2025, 3, day, hour, minute).naive_utc()
}

fn metformin(subject: &str, times: Vec<ClockTime>) -> Medication {
    Medication::from_submission(
        SubjectId(subject.to_string()),
        NewMedication {
            name: "Metformin".to_string(),
            dosage: Some("500 mg".to_string()),
            times,
            reminder_enabled: true,
        },
        at(2025, 3, 1, 7, 0),
    )
}

struct TableWeather(HashMap<&'static str, f64>);

impl WeatherProvider for TableWeather {
    fn current_temperature(&self, region: &str) -> Result<f64, WeatherError> {
        self.0
            .get(region)
            .copied()
            .ok_or_else(|| WeatherError::UnknownRegion(region.to_string()))
    }
}

#[test]
fn reminder_fires_inside_the_delay_window() {
    let schedule = ReminderSchedule::default();
    let medication = metformin("sub-1", vec![clock(8, 0)]);

    for minute in [10, 15, 19] {
        let actions = plan_medication_reminders(
            std::slice::from_ref(&medication),
            local(5, 8, minute),
            &schedule,
        );
        assert!(
            matches!(actions.as_slice(), [ReminderAction::Notify { .. }]),
            "minute {minute}: {actions:?}"
        );
    }

    for minute in [0, 9, 20, 45] {
        let actions = plan_medication_reminders(
            std::slice::from_ref(&medication),
            local(5, 8, minute),
            &schedule,
        );
        assert!(actions.is_empty(), "minute {minute}: {actions:?}");
    }
}

#[test]
fn taken_doses_are_left_alone() {
    let schedule = ReminderSchedule::default();
    let mut medication = metformin("sub-1", vec![clock(8, 0)]);
    medication.dose_records.push(DoseRecord {
        date: date(2025, 3, 5),
        time: clock(8, 0),
        taken: true,
        taken_at: Some(at(2025, 3, 5, 8, 3)),
    });

    let reminder = plan_medication_reminders(
        std::slice::from_ref(&medication),
        local(5, 8, 10),
        &schedule,
    );
    let missed = plan_medication_reminders(
        std::slice::from_ref(&medication),
        local(5, 9, 10),
        &schedule,
    );
    assert!(reminder.is_empty());
    assert!(missed.is_empty());
}

#[test]
fn late_evening_doses_roll_past_midnight() {
    let schedule = ReminderSchedule::default();
    let medication = metformin("sub-1", vec![clock(23, 30)]);

    let actions = plan_medication_reminders(
        std::slice::from_ref(&medication),
        local(6, 0, 45),
        &schedule,
    );
    assert_eq!(
        actions,
        vec![ReminderAction::MarkMissed {
            medication_id: medication.id.clone(),
            date: date(2025, 3, 5),
            time: clock(23, 30),
        }]
    );
}

#[test]
fn disabled_reminders_are_skipped() {
    let schedule = ReminderSchedule::default();
    let mut medication = metformin("sub-1", vec![clock(8, 0)]);
    medication.reminder_enabled = false;

    assert!(plan_medication_reminders(&[medication], local(5, 8, 10), &schedule).is_empty());
}

#[test]
fn medication_pass_notifies_and_records_missed_doses() {
    let subjects = MemorySubjects::with([subject_record("sub-1", date(1970, 1, 1), 80.0, 170.0)]);
    let journal = MemoryJournal::default();
    let morning = journal
        .insert_medication(metformin("sub-1", vec![clock(8, 0)]))
        .expect("insert");
    let early = journal
        .insert_medication(metformin("sub-1", vec![clock(7, 0)]))
        .expect("insert");
    let runner = ReminderRunner::new(
        Arc::new(subjects.clone()),
        Arc::new(journal.clone()),
        Arc::new(TableWeather(HashMap::new())),
        ReminderSchedule::default(),
    );

    let report = runner
        .medication_pass(at(2025, 3, 5, 8, 12))
        .expect("pass runs");

    assert_eq!(report.notified, 1);
    assert_eq!(report.missed, 1);
    let notifications = subjects.get("sub-1").notifications;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Medication);
    assert!(notifications[0].message.contains("Metformin"));
    assert!(notifications[0].message.contains("08:00"));

    assert!(journal.medication(&morning.id).dose_records.is_empty());
    let missed = journal.medication(&early.id).dose_records;
    assert_eq!(missed.len(), 1);
    assert!(!missed[0].taken);

    let again = runner
        .medication_pass(at(2025, 3, 5, 8, 14))
        .expect("pass runs");
    assert_eq!(again.missed, 0, "missed dose is recorded once");
}

/// Journal that logs a taken dose right after the pass reads its medication snapshot.
struct DoseLoggedAfterSnapshot {
    inner: MemoryJournal,
    medication: RecordId,
    taken: DoseRecord,
}

impl JournalRepository for DoseLoggedAfterSnapshot {
    fn insert_glucose(&self, reading: GlucoseReading) -> Result<GlucoseReading, RepositoryError> {
        self.inner.insert_glucose(reading)
    }

    fn glucose_for(&self, subject: &SubjectId) -> Result<Vec<GlucoseReading>, RepositoryError> {
        self.inner.glucose_for(subject)
    }

    fn delete_glucose(&self, subject: &SubjectId, id: &RecordId) -> Result<bool, RepositoryError> {
        self.inner.delete_glucose(subject, id)
    }

    fn insert_activity(&self, session: ActivitySession) -> Result<ActivitySession, RepositoryError> {
        self.inner.insert_activity(session)
    }

    fn activity_for(&self, subject: &SubjectId) -> Result<Vec<ActivitySession>, RepositoryError> {
        self.inner.activity_for(subject)
    }

    fn insert_meal(&self, meal: MealEntry) -> Result<MealEntry, RepositoryError> {
        self.inner.insert_meal(meal)
    }

    fn meals_for(&self, subject: &SubjectId) -> Result<Vec<MealEntry>, RepositoryError> {
        self.inner.meals_for(subject)
    }

    fn delete_meal(&self, subject: &SubjectId, id: &RecordId) -> Result<bool, RepositoryError> {
        self.inner.delete_meal(subject, id)
    }

    fn insert_medication(&self, medication: Medication) -> Result<Medication, RepositoryError> {
        self.inner.insert_medication(medication)
    }

    fn update_medication(&self, medication: Medication) -> Result<(), RepositoryError> {
        self.inner.update_medication(medication)
    }

    fn append_dose_record(&self, id: &RecordId, record: DoseRecord) -> Result<bool, RepositoryError> {
        self.inner.append_dose_record(id, record)
    }

    fn medications_for(&self, subject: &SubjectId) -> Result<Vec<Medication>, RepositoryError> {
        self.inner.medications_for(subject)
    }

    fn reminder_medications(&self) -> Result<Vec<Medication>, RepositoryError> {
        let snapshot = self.inner.reminder_medications()?;
        self.inner
            .append_dose_record(&self.medication, self.taken.clone())?;
        Ok(snapshot)
    }
}

fn pass_with_dose_logged_after_snapshot(
    taken_at: ClockTime,
) -> (RecordId, MemoryJournal, PassReport) {
    let subjects = MemorySubjects::with([subject_record("sub-1", date(1970, 1, 1), 80.0, 170.0)]);
    let inner = MemoryJournal::default();
    let medication = inner
        .insert_medication(metformin("sub-1", vec![clock(8, 0), clock(9, 0)]))
        .expect("insert");
    let journal = DoseLoggedAfterSnapshot {
        inner: inner.clone(),
        medication: medication.id.clone(),
        taken: DoseRecord {
            date: date(2025, 3, 5),
            time: taken_at,
            taken: true,
            taken_at: Some(at(2025, 3, 5, 9, 9)),
        },
    };
    let runner = ReminderRunner::new(
        Arc::new(subjects),
        Arc::new(journal),
        Arc::new(TableWeather(HashMap::new())),
        ReminderSchedule::default(),
    );

    let report = runner
        .medication_pass(at(2025, 3, 5, 9, 10))
        .expect("pass runs");
    (medication.id, inner, report)
}

#[test]
fn dose_logged_during_a_pass_is_kept_alongside_the_missed_marker() {
    let (id, journal, report) = pass_with_dose_logged_after_snapshot(clock(9, 0));

    assert_eq!(report.notified, 1);
    assert_eq!(report.missed, 1);
    let records = journal.medication(&id).dose_records;
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .any(|record| record.taken && record.time == clock(9, 0)));
    assert!(records
        .iter()
        .any(|record| !record.taken && record.time == clock(8, 0)));
}

#[test]
fn dose_logged_during_a_pass_wins_over_the_missed_marker() {
    let (id, journal, report) = pass_with_dose_logged_after_snapshot(clock(8, 0));

    assert_eq!(report.missed, 0);
    assert_eq!(report.skipped, 1);
    let records = journal.medication(&id).dose_records;
    assert_eq!(records.len(), 1);
    assert!(records[0].taken);
}

#[test]
fn weather_advice_thresholds() {
    assert_eq!(advisory_for(31.0), Some(WeatherAdvisory::Hot));
    assert_eq!(advisory_for(30.0), Some(WeatherAdvisory::Warm));
    assert_eq!(advisory_for(25.5), Some(WeatherAdvisory::Warm));
    assert_eq!(advisory_for(25.0), None);
    assert_eq!(advisory_for(10.0), None);
    assert_eq!(advisory_for(9.9), Some(WeatherAdvisory::Cold));
}

#[test]
fn weather_pass_targets_diabetic_subjects_and_skips_failures() {
    let mut hot = subject_record("sub-hot", date(1960, 1, 1), 90.0, 170.0);
    hot.region = "Termez".to_string();
    hot.has_diabetes = true;
    let mut lost = subject_record("sub-lost", date(1960, 1, 1), 90.0, 170.0);
    lost.region = "Atlantis".to_string();
    lost.has_diabetes = true;
    let mut healthy = subject_record("sub-healthy", date(1960, 1, 1), 70.0, 170.0);
    healthy.region = "Termez".to_string();

    let subjects = MemorySubjects::with([hot, lost, healthy]);
    let runner = ReminderRunner::new(
        Arc::new(subjects.clone()),
        Arc::new(MemoryJournal::default()),
        Arc::new(TableWeather(HashMap::from([("Termez", 38.0)]))),
        ReminderSchedule::default(),
    );

    let report = runner.weather_pass(at(2025, 7, 1, 8, 0)).expect("pass runs");

    assert_eq!(report.notified, 1);
    assert_eq!(report.skipped, 1);
    let inbox = subjects.get("sub-hot").notifications;
    assert_eq!(inbox[0].kind, NotificationKind::Weather);
    assert_eq!(inbox[0].message, WeatherAdvisory::Hot.message());
    assert!(subjects.get("sub-healthy").notifications.is_empty());
}

#[test]
fn weather_pass_runs_once_per_day_at_the_configured_hour() {
    let schedule = ReminderSchedule::default();

    assert!(schedule.weather_due(None, local(5, 8, 0)));
    assert!(!schedule.weather_due(Some(date(2025, 3, 5)), local(5, 8, 30)));
    assert!(schedule.weather_due(Some(date(2025, 3, 4)), local(5, 8, 30)));
    assert!(!schedule.weather_due(None, local(5, 9, 0)));
}
