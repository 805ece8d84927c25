use super::activity::ActivitySession;
use super::domain::RecordId;
use super::glucose::GlucoseReading;
use super::medication::{DoseRecord, Medication};
use super::nutrition::MealEntry;
use crate::workflows::subjects::{RepositoryError, SubjectId};

/// Storage abstraction for the per-subject health journal.
///
/// Deletes are owner scoped and report whether anything was removed.
pub trait JournalRepository: Send + Sync {
    fn insert_glucose(&self, reading: GlucoseReading) -> Result<GlucoseReading, RepositoryError>;
    fn glucose_for(&self, subject: &SubjectId) -> Result<Vec<GlucoseReading>, RepositoryError>;
    fn delete_glucose(&self, subject: &SubjectId, id: &RecordId) -> Result<bool, RepositoryError>;

    fn insert_activity(&self, session: ActivitySession)
        -> Result<ActivitySession, RepositoryError>;
    fn activity_for(&self, subject: &SubjectId) -> Result<Vec<ActivitySession>, RepositoryError>;

    fn insert_meal(&self, meal: MealEntry) -> Result<MealEntry, RepositoryError>;
    fn meals_for(&self, subject: &SubjectId) -> Result<Vec<MealEntry>, RepositoryError>;
    fn delete_meal(&self, subject: &SubjectId, id: &RecordId) -> Result<bool, RepositoryError>;

    fn insert_medication(&self, medication: Medication) -> Result<Medication, RepositoryError>;
    /// Replaces the editable fields and the active flag; stored dose records are kept.
    fn update_medication(&self, medication: Medication) -> Result<(), RepositoryError>;
    /// Appends under the store's lock with [`Medication::push_dose`] semantics.
    /// `NotFound` for an unknown medication.
    fn append_dose_record(&self, id: &RecordId, record: DoseRecord)
        -> Result<bool, RepositoryError>;
    fn medications_for(&self, subject: &SubjectId) -> Result<Vec<Medication>, RepositoryError>;
    /// Active medications with reminders switched on, across all subjects.
    fn reminder_medications(&self) -> Result<Vec<Medication>, RepositoryError>;
}
