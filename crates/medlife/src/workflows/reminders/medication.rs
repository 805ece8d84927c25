use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::ReminderSchedule;
use crate::workflows::journal::{ClockTime, Medication, RecordId};
use crate::workflows::subjects::SubjectId;

/// Side effect requested by a medication pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderAction {
    Notify {
        subject_id: SubjectId,
        medication_id: RecordId,
        message: String,
    },
    MarkMissed {
        medication_id: RecordId,
        date: NaiveDate,
        time: ClockTime,
    },
}

/// Plan one medication pass at local time `now`.
///
/// Each dose time is anchored to its most recent occurrence at or before `now`, so a
/// late-evening dose is still tracked after midnight. Inactive or reminder-disabled
/// medications are skipped.
pub fn plan_medication_reminders(
    medications: &[Medication],
    now: NaiveDateTime,
    schedule: &ReminderSchedule,
) -> Vec<ReminderAction> {
    let mut actions = Vec::new();

    for medication in medications
        .iter()
        .filter(|medication| medication.active && medication.reminder_enabled)
    {
        for &time in &medication.times {
            let mut due = now.date().and_time(time.time());
            if due > now {
                due = due - Duration::days(1);
            }
            let elapsed = (now - due).num_minutes();
            let dose_date = due.date();

            if medication.taken_on(dose_date, time) {
                continue;
            }

            if schedule.in_window(schedule.reminder_delay_minutes, elapsed) {
                actions.push(ReminderAction::Notify {
                    subject_id: medication.subject_id.clone(),
                    medication_id: medication.id.clone(),
                    message: format!(
                        "Time to take {} ({time}). Please take your medication!",
                        medication.name
                    ),
                });
            }

            let already_recorded = medication
                .dose_records
                .iter()
                .any(|record| record.date == dose_date && record.time == time);
            if !already_recorded && schedule.in_window(schedule.missed_after_minutes, elapsed) {
                actions.push(ReminderAction::MarkMissed {
                    medication_id: medication.id.clone(),
                    date: dose_date,
                    time,
                });
            }
        }
    }

    actions
}
