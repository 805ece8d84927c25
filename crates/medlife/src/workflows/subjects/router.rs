use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;

use super::domain::{ProfileUpdate, Registration, SubjectId};
use super::repository::{RepositoryError, SubjectRepository};
use super::service::{SubjectService, SubjectServiceError};
use crate::workflows::http::{error_response, success_response, today};

/// Registration, profile and notification inbox endpoints.
pub fn subject_router<R>(service: Arc<SubjectService<R>>) -> Router
where
    R: SubjectRepository + 'static,
{
    Router::new()
        .route("/api/v1/subjects", post(register_handler::<R>))
        .route(
            "/api/v1/subjects/:subject_id",
            get(profile_handler::<R>).put(update_handler::<R>),
        )
        .route(
            "/api/v1/subjects/:subject_id/notifications",
            get(notifications_handler::<R>),
        )
        .route(
            "/api/v1/subjects/:subject_id/notifications/:notification_id/read",
            put(mark_read_handler::<R>),
        )
        .with_state(service)
}

fn failure(error: SubjectServiceError) -> Response {
    match error {
        SubjectServiceError::Validation(message) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, message)
        }
        SubjectServiceError::Repository(RepositoryError::Conflict) => {
            error_response(StatusCode::CONFLICT, "phone number already registered")
        }
        SubjectServiceError::Repository(RepositoryError::NotFound) => {
            error_response(StatusCode::NOT_FOUND, "subject not found")
        }
        other => error_response(StatusCode::INTERNAL_SERVER_ERROR, other),
    }
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<SubjectService<R>>>,
    Json(registration): Json<Registration>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    match service.register(registration, Utc::now()) {
        Ok(record) => {
            let view = record.profile_view(today());
            (StatusCode::CREATED, Json(view)).into_response()
        }
        Err(error) => failure(error),
    }
}

pub(crate) async fn profile_handler<R>(
    State(service): State<Arc<SubjectService<R>>>,
    Path(subject_id): Path<String>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    match service.profile(&SubjectId(subject_id), today()) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<SubjectService<R>>>,
    Path(subject_id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    match service.update_profile(&SubjectId(subject_id), update, today()) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn notifications_handler<R>(
    State(service): State<Arc<SubjectService<R>>>,
    Path(subject_id): Path<String>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    match service.notifications(&SubjectId(subject_id)) {
        Ok(notifications) => (StatusCode::OK, Json(notifications)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn mark_read_handler<R>(
    State(service): State<Arc<SubjectService<R>>>,
    Path((subject_id, notification_id)): Path<(String, String)>,
) -> Response
where
    R: SubjectRepository + 'static,
{
    match service.mark_notification_read(&SubjectId(subject_id), &notification_id) {
        Ok(()) => success_response(StatusCode::OK),
        Err(error) => failure(error),
    }
}
