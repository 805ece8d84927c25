use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::medication::{plan_medication_reminders, ReminderAction};
use super::weather::{advisory_for, WeatherProvider};
use super::ReminderSchedule;
use crate::workflows::journal::{DoseRecord, JournalRepository};
use crate::workflows::subjects::{
    Notification, NotificationKind, RepositoryError, SubjectId, SubjectRepository,
};

/// Tally returned by one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub notified: usize,
    pub missed: usize,
    pub skipped: usize,
}

/// Applies reminder passes against the repositories.
pub struct ReminderRunner<S, J, W> {
    subjects: Arc<S>,
    journal: Arc<J>,
    weather: Arc<W>,
    schedule: ReminderSchedule,
}

impl<S, J, W> ReminderRunner<S, J, W>
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
    W: WeatherProvider + 'static,
{
    pub fn new(subjects: Arc<S>, journal: Arc<J>, weather: Arc<W>, schedule: ReminderSchedule) -> Self {
        Self {
            subjects,
            journal,
            weather,
            schedule,
        }
    }

    pub fn schedule(&self) -> &ReminderSchedule {
        &self.schedule
    }

    /// Medication pass. Dose times are read in the time zone of `now`.
    pub fn medication_pass<Tz: TimeZone>(
        &self,
        now: DateTime<Tz>,
    ) -> Result<PassReport, RepositoryError> {
        let stamp = now.with_timezone(&Utc);
        let medications = self.journal.reminder_medications()?;
        let actions = plan_medication_reminders(&medications, now.naive_local(), &self.schedule);
        let mut report = PassReport::default();

        for action in actions {
            match action {
                ReminderAction::Notify {
                    subject_id,
                    medication_id,
                    message,
                } => match self.notify(&subject_id, NotificationKind::Medication, message, stamp) {
                    Ok(true) => report.notified += 1,
                    Ok(false) => report.skipped += 1,
                    Err(error) => {
                        warn!(
                            subject = %subject_id.0,
                            medication = %medication_id.0,
                            error = %error,
                            "medication reminder failed"
                        );
                        report.skipped += 1;
                    }
                },
                ReminderAction::MarkMissed {
                    medication_id,
                    date,
                    time,
                } => {
                    let record = DoseRecord {
                        date,
                        time,
                        taken: false,
                        taken_at: None,
                    };
                    // Applied to the stored record; a dose logged after the snapshot wins.
                    match self.journal.append_dose_record(&medication_id, record) {
                        Ok(true) => report.missed += 1,
                        Ok(false) => report.skipped += 1,
                        Err(error) => {
                            warn!(medication = %medication_id.0, error = %error, "failed to record missed dose");
                            report.skipped += 1;
                        }
                    }
                }
            }
        }

        info!(
            notified = report.notified,
            missed = report.missed,
            skipped = report.skipped,
            "medication reminder pass finished"
        );
        Ok(report)
    }

    /// Weather pass over every subject flagged with diabetes. Provider failures skip the
    /// subject.
    pub fn weather_pass(&self, now: DateTime<Utc>) -> Result<PassReport, RepositoryError> {
        let mut report = PassReport::default();

        for subject in self.subjects.with_diabetes()? {
            let temperature = match self.weather.current_temperature(&subject.region) {
                Ok(temperature) => temperature,
                Err(error) => {
                    warn!(subject = %subject.id.0, region = %subject.region, error = %error, "weather lookup failed");
                    report.skipped += 1;
                    continue;
                }
            };

            let Some(advisory) = advisory_for(temperature) else {
                continue;
            };
            match self.notify(&subject.id, NotificationKind::Weather, advisory.message().to_string(), now) {
                Ok(true) => report.notified += 1,
                Ok(false) => report.skipped += 1,
                Err(error) => {
                    warn!(subject = %subject.id.0, error = %error, "weather notification failed");
                    report.skipped += 1;
                }
            }
        }

        info!(
            notified = report.notified,
            skipped = report.skipped,
            "weather pass finished"
        );
        Ok(report)
    }

    /// Push a notification; `false` when the subject no longer exists.
    fn notify(
        &self,
        subject_id: &SubjectId,
        kind: NotificationKind,
        message: String,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        self.subjects
            .push_notification(subject_id, Notification::new(kind, message, at))
    }
}
