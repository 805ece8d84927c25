//! Subject registration, profile maintenance and the notification inbox.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    age_on, Gender, Height, Language, Notification, NotificationKind, ProfileUpdate,
    Registration, SubjectId, SubjectProfileView, SubjectRecord,
};
pub use repository::{RepositoryError, SubjectRepository};
pub use router::subject_router;
pub use service::{SubjectService, SubjectServiceError};
