//! Care circle: invite links, family membership and the shared journal view used by
//! relatives and doctors.

pub mod router;
pub mod service;
pub mod summary;


pub use router::care_router;
pub use service::{CareService, CareServiceError};
pub use summary::{CareSummary, CareView, CircleMembers, InviteLink, PatientView};
