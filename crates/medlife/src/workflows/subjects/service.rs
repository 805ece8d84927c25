use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use super::domain::{
    Height, Notification, ProfileUpdate, Registration, SubjectId, SubjectProfileView,
    SubjectRecord,
};
use super::repository::{RepositoryError, SubjectRepository};

/// Registration and profile maintenance over a subject repository.
pub struct SubjectService<R> {
    repository: Arc<R>,
}

static SUBJECT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_subject_id() -> SubjectId {
    let id = SUBJECT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubjectId(format!("sub-{id:06}"))
}

impl<R> SubjectService<R>
where
    R: SubjectRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Create a subject. Phones are unique; an inviter must already exist and
    /// gains the new subject in its family list.
    pub fn register(
        &self,
        registration: Registration,
        now: DateTime<Utc>,
    ) -> Result<SubjectRecord, SubjectServiceError> {
        validate_registration(&registration)?;

        if self.repository.find_by_phone(&registration.phone)?.is_some() {
            return Err(SubjectServiceError::Repository(RepositoryError::Conflict));
        }

        if let Some(inviter_id) = &registration.invited_by {
            if self.repository.fetch(inviter_id)?.is_none() {
                return Err(SubjectServiceError::Validation(format!(
                    "inviting subject {} does not exist",
                    inviter_id.0
                )));
            }
        }

        let record = SubjectRecord {
            id: next_subject_id(),
            first_name: registration.first_name.trim().to_string(),
            last_name: registration.last_name.trim().to_string(),
            gender: registration.gender,
            birth_date: registration.birth_date,
            weight_kg: registration.weight_kg,
            height: Height::from_input(registration.height),
            region: registration.region,
            phone: registration.phone,
            language: registration.language,
            has_diabetes: false,
            screening_history: Vec::new(),
            invited_by: registration.invited_by,
            family_members: Vec::new(),
            notifications: Vec::new(),
            created_at: now,
        };
        let record = self.repository.insert(record)?;

        if let Some(inviter_id) = &record.invited_by {
            self.repository
                .add_family_member(inviter_id, record.id.clone())?;
        }

        info!(subject = %record.id.0, invited = record.invited_by.is_some(), "subject registered");
        Ok(record)
    }

    pub fn record(&self, id: &SubjectId) -> Result<SubjectRecord, SubjectServiceError> {
        self.repository
            .fetch(id)?
            .ok_or(SubjectServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn profile(
        &self,
        id: &SubjectId,
        today: NaiveDate,
    ) -> Result<SubjectProfileView, SubjectServiceError> {
        Ok(self.record(id)?.profile_view(today))
    }

    pub fn update_profile(
        &self,
        id: &SubjectId,
        update: ProfileUpdate,
        today: NaiveDate,
    ) -> Result<SubjectProfileView, SubjectServiceError> {
        if let Some(weight) = update.weight_kg {
            ensure_positive("weight_kg", weight)?;
        }
        if let Some(height) = update.height {
            ensure_positive("height", height)?;
        }

        let mut record = self.record(id)?;
        if let Some(first_name) = update.first_name {
            record.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = update.last_name {
            record.last_name = last_name.trim().to_string();
        }
        if let Some(weight) = update.weight_kg {
            record.weight_kg = weight;
        }
        if let Some(height) = update.height {
            record.height = Height::from_input(height);
        }
        if let Some(region) = update.region {
            record.region = region;
        }
        if let Some(language) = update.language {
            record.language = language;
        }

        self.repository.update(record.clone())?;
        Ok(record.profile_view(today))
    }

    /// Inbox, newest first.
    pub fn notifications(&self, id: &SubjectId) -> Result<Vec<Notification>, SubjectServiceError> {
        let mut notifications = self.record(id)?.notifications;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    /// Unknown notification ids leave the inbox untouched.
    pub fn mark_notification_read(
        &self,
        id: &SubjectId,
        notification_id: &str,
    ) -> Result<(), SubjectServiceError> {
        self.repository.mark_notification_read(id, notification_id)?;
        Ok(())
    }
}

fn validate_registration(registration: &Registration) -> Result<(), SubjectServiceError> {
    if registration.first_name.trim().is_empty() || registration.last_name.trim().is_empty() {
        return Err(SubjectServiceError::Validation(
            "first and last name are required".to_string(),
        ));
    }
    if registration.phone.trim().is_empty() {
        return Err(SubjectServiceError::Validation(
            "phone number is required".to_string(),
        ));
    }
    ensure_positive("weight_kg", registration.weight_kg)?;
    ensure_positive("height", registration.height)
}

fn ensure_positive(field: &str, value: f64) -> Result<(), SubjectServiceError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SubjectServiceError::Validation(format!(
            "{field} must be a positive number"
        )))
    }
}

/// Error raised by the subject service.
#[derive(Debug, thiserror::Error)]
pub enum SubjectServiceError {
    #[error("invalid subject data: {0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
