use super::domain::{Notification, SubjectId, SubjectRecord};

/// Storage abstraction for subject documents.
///
/// Notifications and family members are list fields shared with background passes, so
/// they change only through the targeted operations below, each applied to the stored
/// record in one step. `update` leaves both lists as stored.
pub trait SubjectRepository: Send + Sync {
    fn insert(&self, record: SubjectRecord) -> Result<SubjectRecord, RepositoryError>;
    fn update(&self, record: SubjectRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SubjectId) -> Result<Option<SubjectRecord>, RepositoryError>;
    fn find_by_phone(&self, phone: &str) -> Result<Option<SubjectRecord>, RepositoryError>;
    fn invited_by(&self, inviter: &SubjectId) -> Result<Vec<SubjectRecord>, RepositoryError>;
    fn with_diabetes(&self) -> Result<Vec<SubjectRecord>, RepositoryError>;

    /// `false` when the subject does not exist.
    fn push_notification(
        &self,
        id: &SubjectId,
        notification: Notification,
    ) -> Result<bool, RepositoryError>;
    /// `NotFound` for an unknown subject, `false` for an unknown notification.
    fn mark_notification_read(
        &self,
        id: &SubjectId,
        notification_id: &str,
    ) -> Result<bool, RepositoryError>;
    /// Idempotent. `NotFound` for an unknown subject.
    fn add_family_member(&self, id: &SubjectId, member: SubjectId) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
