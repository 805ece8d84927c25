use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use super::activity::{ActivitySession, ActivitySummary, NewActivitySession};
use super::domain::RecordId;
use super::glucose::{GlucoseReading, GlucoseSummary, NewGlucoseReading};
use super::medication::{AdherenceStats, DoseIntake, DoseRecord, Medication, NewMedication};
use super::nutrition::{MealEntry, NewMeal};
use super::period::{DateWindow, StatsPeriod};
use super::repository::JournalRepository;
use crate::workflows::subjects::{RepositoryError, SubjectId, SubjectRepository};

/// Service fronting the journal repository, scoped to registered subjects.
pub struct JournalService<S, J> {
    subjects: Arc<S>,
    journal: Arc<J>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GlucoseStats {
    pub period: StatsPeriod,
    pub window: DateWindow,
    pub records: Vec<GlucoseReading>,
    pub summary: GlucoseSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityStats {
    pub period: StatsPeriod,
    pub window: DateWindow,
    pub records: Vec<ActivitySession>,
    pub summary: ActivitySummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct MedicationStats {
    pub period: StatsPeriod,
    pub window: DateWindow,
    pub stats: Vec<AdherenceStats>,
}

impl<S, J> JournalService<S, J>
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    pub fn new(subjects: Arc<S>, journal: Arc<J>) -> Self {
        Self { subjects, journal }
    }

    fn ensure_subject(&self, subject: &SubjectId) -> Result<(), JournalServiceError> {
        match self.subjects.fetch(subject)? {
            Some(_) => Ok(()),
            None => Err(JournalServiceError::SubjectNotFound),
        }
    }

    pub fn record_glucose(
        &self,
        subject: &SubjectId,
        reading: NewGlucoseReading,
        now: DateTime<Utc>,
    ) -> Result<GlucoseReading, JournalServiceError> {
        if !reading.value.is_finite() || reading.value <= 0.0 {
            return Err(JournalServiceError::Validation(
                "glucose value must be a positive number".to_string(),
            ));
        }
        self.ensure_subject(subject)?;

        let reading = GlucoseReading::from_submission(subject.clone(), reading, now);
        Ok(self.journal.insert_glucose(reading)?)
    }

    /// Readings inside the period window, oldest first.
    pub fn glucose_stats(
        &self,
        subject: &SubjectId,
        period: StatsPeriod,
        target: NaiveDate,
    ) -> Result<GlucoseStats, JournalServiceError> {
        self.ensure_subject(subject)?;
        let window = period.window(target);

        let mut records: Vec<GlucoseReading> = self
            .journal
            .glucose_for(subject)?
            .into_iter()
            .filter(|reading| window.contains(reading.date))
            .collect();
        records.sort_by_key(|reading| (reading.date, reading.time));

        let summary = GlucoseSummary::from_readings(&records);
        Ok(GlucoseStats {
            period,
            window,
            records,
            summary,
        })
    }

    pub fn delete_glucose(
        &self,
        subject: &SubjectId,
        id: &RecordId,
    ) -> Result<bool, JournalServiceError> {
        Ok(self.journal.delete_glucose(subject, id)?)
    }

    pub fn record_activity(
        &self,
        subject: &SubjectId,
        session: NewActivitySession,
        now: DateTime<Utc>,
    ) -> Result<ActivitySession, JournalServiceError> {
        if !session.distance_meters.is_finite() || session.distance_meters < 0.0 {
            return Err(JournalServiceError::Validation(
                "distance must be zero or more metres".to_string(),
            ));
        }
        self.ensure_subject(subject)?;

        let session = ActivitySession::from_submission(subject.clone(), session, now);
        Ok(self.journal.insert_activity(session)?)
    }

    pub fn activity_stats(
        &self,
        subject: &SubjectId,
        period: StatsPeriod,
        target: NaiveDate,
    ) -> Result<ActivityStats, JournalServiceError> {
        self.ensure_subject(subject)?;
        let window = period.window(target);

        let mut records: Vec<ActivitySession> = self
            .journal
            .activity_for(subject)?
            .into_iter()
            .filter(|session| window.contains(session.date))
            .collect();
        records.sort_by_key(|session| session.date);

        let summary = ActivitySummary::from_sessions(&records);
        Ok(ActivityStats {
            period,
            window,
            records,
            summary,
        })
    }

    pub fn record_meal(
        &self,
        subject: &SubjectId,
        meal: NewMeal,
        now: DateTime<Utc>,
    ) -> Result<MealEntry, JournalServiceError> {
        if meal.foods.is_empty() {
            return Err(JournalServiceError::Validation(
                "a meal needs at least one food".to_string(),
            ));
        }
        self.ensure_subject(subject)?;

        let meal = MealEntry::from_submission(subject.clone(), meal, now);
        Ok(self.journal.insert_meal(meal)?)
    }

    /// Meals newest first; without a period every meal is returned.
    pub fn meals(
        &self,
        subject: &SubjectId,
        period: Option<StatsPeriod>,
        target: NaiveDate,
    ) -> Result<Vec<MealEntry>, JournalServiceError> {
        self.ensure_subject(subject)?;
        let window = period.map(|period| period.window(target));

        let mut meals: Vec<MealEntry> = self
            .journal
            .meals_for(subject)?
            .into_iter()
            .filter(|meal| window.map_or(true, |window| window.contains(meal.date)))
            .collect();
        meals.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(meals)
    }

    pub fn delete_meal(&self, subject: &SubjectId, id: &RecordId) -> Result<bool, JournalServiceError> {
        Ok(self.journal.delete_meal(subject, id)?)
    }

    pub fn add_medication(
        &self,
        subject: &SubjectId,
        medication: NewMedication,
        now: DateTime<Utc>,
    ) -> Result<Medication, JournalServiceError> {
        validate_medication(&medication)?;
        self.ensure_subject(subject)?;

        let medication = Medication::from_submission(subject.clone(), medication, now);
        info!(subject = %subject.0, medication = %medication.id.0, "medication added");
        Ok(self.journal.insert_medication(medication)?)
    }

    /// Active medications, most recently added first.
    pub fn active_medications(
        &self,
        subject: &SubjectId,
    ) -> Result<Vec<Medication>, JournalServiceError> {
        self.ensure_subject(subject)?;
        let mut medications: Vec<Medication> = self
            .journal
            .medications_for(subject)?
            .into_iter()
            .filter(|medication| medication.active)
            .collect();
        medications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(medications)
    }

    fn medication(
        &self,
        subject: &SubjectId,
        id: &RecordId,
    ) -> Result<Medication, JournalServiceError> {
        self.journal
            .medications_for(subject)?
            .into_iter()
            .find(|medication| &medication.id == id)
            .ok_or(JournalServiceError::MedicationNotFound)
    }

    pub fn update_medication(
        &self,
        subject: &SubjectId,
        id: &RecordId,
        update: NewMedication,
    ) -> Result<Medication, JournalServiceError> {
        validate_medication(&update)?;
        let mut medication = self.medication(subject, id)?;
        medication.apply_update(update);
        self.journal.update_medication(medication.clone())?;
        Ok(medication)
    }

    /// Soft delete; dose history is kept for statistics.
    pub fn deactivate_medication(
        &self,
        subject: &SubjectId,
        id: &RecordId,
    ) -> Result<bool, JournalServiceError> {
        let mut medication = match self.medication(subject, id) {
            Ok(medication) => medication,
            Err(JournalServiceError::MedicationNotFound) => return Ok(false),
            Err(other) => return Err(other),
        };
        medication.active = false;
        self.journal.update_medication(medication)?;
        Ok(true)
    }

    pub fn record_dose(
        &self,
        subject: &SubjectId,
        id: &RecordId,
        intake: DoseIntake,
        now: DateTime<Utc>,
    ) -> Result<Medication, JournalServiceError> {
        self.medication(subject, id)?;
        self.journal.append_dose_record(
            id,
            DoseRecord {
                date: intake.date.unwrap_or_else(|| now.date_naive()),
                time: intake.time,
                taken: true,
                taken_at: Some(now),
            },
        )?;
        self.medication(subject, id)
    }

    pub fn medication_stats(
        &self,
        subject: &SubjectId,
        period: StatsPeriod,
        target: NaiveDate,
    ) -> Result<MedicationStats, JournalServiceError> {
        let window = period.window(target);
        let stats = self
            .active_medications(subject)?
            .iter()
            .map(|medication| medication.adherence(window))
            .collect();
        Ok(MedicationStats {
            period,
            window,
            stats,
        })
    }
}

fn validate_medication(medication: &NewMedication) -> Result<(), JournalServiceError> {
    if medication.name.trim().is_empty() {
        return Err(JournalServiceError::Validation(
            "medication name is required".to_string(),
        ));
    }
    if medication.times.is_empty() {
        return Err(JournalServiceError::Validation(
            "at least one dose time is required".to_string(),
        ));
    }
    Ok(())
}

/// Error raised by the journal service.
#[derive(Debug, thiserror::Error)]
pub enum JournalServiceError {
    #[error("subject not found")]
    SubjectNotFound,
    #[error("medication not found")]
    MedicationNotFound,
    #[error("invalid journal entry: {0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
