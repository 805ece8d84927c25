use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::{AppointmentRequest, ScreeningSubmission, VisitOutcome};
use super::service::{ScreeningService, ScreeningServiceError};
use crate::workflows::http::{error_response, today};
use crate::workflows::subjects::{RepositoryError, SubjectId, SubjectRepository};

/// Router exposing the questionnaire and screening history endpoints.
pub fn screening_router<S>(service: Arc<ScreeningService<S>>) -> Router
where
    S: SubjectRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/subjects/:subject_id/screening/questions",
            get(questions_handler::<S>),
        )
        .route(
            "/api/v1/subjects/:subject_id/screening",
            post(submit_handler::<S>),
        )
        .route(
            "/api/v1/subjects/:subject_id/screening/appointment",
            post(appointment_handler::<S>),
        )
        .route(
            "/api/v1/subjects/:subject_id/screening/visit-result",
            post(visit_handler::<S>),
        )
        .with_state(service)
}

fn failure(error: ScreeningServiceError) -> Response {
    let status = match &error {
        ScreeningServiceError::SubjectNotFound
        | ScreeningServiceError::EntryNotFound { .. }
        | ScreeningServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ScreeningServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ScreeningServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, error)
}

pub(crate) async fn questions_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(subject_id): Path<String>,
) -> Response
where
    S: SubjectRepository + 'static,
{
    match service.questions_for(&SubjectId(subject_id), today()) {
        Ok(questions) => {
            (StatusCode::OK, Json(json!({ "questions": questions }))).into_response()
        }
        Err(error) => failure(error),
    }
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(subject_id): Path<String>,
    Json(submission): Json<ScreeningSubmission>,
) -> Response
where
    S: SubjectRepository + 'static,
{
    match service.submit(&SubjectId(subject_id), &submission.answers, Utc::now()) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn appointment_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(subject_id): Path<String>,
    Json(request): Json<AppointmentRequest>,
) -> Response
where
    S: SubjectRepository + 'static,
{
    match service.schedule_appointment(&SubjectId(subject_id), request) {
        Ok(entry) => {
            (StatusCode::OK, Json(json!({ "success": true, "entry": entry }))).into_response()
        }
        Err(error) => failure(error),
    }
}

pub(crate) async fn visit_handler<S>(
    State(service): State<Arc<ScreeningService<S>>>,
    Path(subject_id): Path<String>,
    Json(outcome): Json<VisitOutcome>,
) -> Response
where
    S: SubjectRepository + 'static,
{
    match service.record_visit(&SubjectId(subject_id), outcome) {
        Ok(entry) => {
            (StatusCode::OK, Json(json!({ "success": true, "entry": entry }))).into_response()
        }
        Err(error) => failure(error),
    }
}
