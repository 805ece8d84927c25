use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::service::{CareService, CareServiceError};
use crate::workflows::http::{error_response, today};
use crate::workflows::journal::JournalRepository;
use crate::workflows::subjects::{RepositoryError, SubjectId, SubjectRepository};

type SharedCare<S, J> = Arc<CareService<S, J>>;

/// Family circle endpoints plus the doctor's patient view.
pub fn care_router<S, J>(service: SharedCare<S, J>) -> Router
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/subjects/:subject_id/care/invite",
            get(invite_handler::<S, J>),
        )
        .route(
            "/api/v1/subjects/:subject_id/care/members",
            get(members_handler::<S, J>),
        )
        .route(
            "/api/v1/subjects/:subject_id/care/members/:member_id",
            get(member_handler::<S, J>),
        )
        .route("/api/v1/patients/:patient_id", get(patient_handler::<S, J>))
        .with_state(service)
}

fn failure(error: CareServiceError) -> Response {
    let status = match &error {
        CareServiceError::SubjectNotFound
        | CareServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CareServiceError::NotInCircle => StatusCode::FORBIDDEN,
        CareServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        CareServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, error)
}

pub(crate) async fn invite_handler<S, J>(
    State(service): State<SharedCare<S, J>>,
    Path(subject_id): Path<String>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    match service.invite_link(&SubjectId(subject_id)) {
        Ok(link) => (StatusCode::OK, Json(link)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn members_handler<S, J>(
    State(service): State<SharedCare<S, J>>,
    Path(subject_id): Path<String>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    match service.members(&SubjectId(subject_id), today()) {
        Ok(members) => (StatusCode::OK, Json(members)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn member_handler<S, J>(
    State(service): State<SharedCare<S, J>>,
    Path((subject_id, member_id)): Path<(String, String)>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    match service.member_detail(&SubjectId(subject_id), &SubjectId(member_id), today()) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn patient_handler<S, J>(
    State(service): State<SharedCare<S, J>>,
    Path(patient_id): Path<String>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    match service.patient_view(&SubjectId(patient_id), today()) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => failure(error),
    }
}
