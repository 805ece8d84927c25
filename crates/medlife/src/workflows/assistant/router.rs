use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use super::providers::{AdviceProvider, FoodRecognizer};
use super::service::{AssistantError, AssistantService};
use crate::workflows::http::error_response;
use crate::workflows::subjects::{RepositoryError, SubjectId, SubjectRepository};

type SharedAssistant<S, A, F> = Arc<AssistantService<S, A, F>>;

#[derive(Debug, Deserialize)]
pub(crate) struct ConsultRequest {
    #[serde(default)]
    symptoms: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MealPhoto {
    image: String,
}

pub fn assistant_router<S, A, F>(service: SharedAssistant<S, A, F>) -> Router
where
    S: SubjectRepository + 'static,
    A: AdviceProvider + 'static,
    F: FoodRecognizer + 'static,
{
    Router::new()
        .route(
            "/api/v1/subjects/:subject_id/assistant/consult",
            post(consult_handler::<S, A, F>),
        )
        .route(
            "/api/v1/subjects/:subject_id/assistant/meal-analysis",
            post(meal_analysis_handler::<S, A, F>),
        )
        .with_state(service)
}

fn failure(error: AssistantError) -> Response {
    let status = match &error {
        AssistantError::EmptySymptoms => StatusCode::UNPROCESSABLE_ENTITY,
        AssistantError::SubjectNotFound
        | AssistantError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssistantError::Provider(_) => StatusCode::BAD_GATEWAY,
        AssistantError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssistantError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, error)
}

pub(crate) async fn consult_handler<S, A, F>(
    State(service): State<SharedAssistant<S, A, F>>,
    Path(subject_id): Path<String>,
    Json(request): Json<ConsultRequest>,
) -> Response
where
    S: SubjectRepository + 'static,
    A: AdviceProvider + 'static,
    F: FoodRecognizer + 'static,
{
    match service.consult(&SubjectId(subject_id), &request.symptoms, Utc::now()) {
        Ok(consultation) => (StatusCode::OK, Json(consultation)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn meal_analysis_handler<S, A, F>(
    State(service): State<SharedAssistant<S, A, F>>,
    Path(subject_id): Path<String>,
    Json(photo): Json<MealPhoto>,
) -> Response
where
    S: SubjectRepository + 'static,
    A: AdviceProvider + 'static,
    F: FoodRecognizer + 'static,
{
    match service.analyze_meal(&SubjectId(subject_id), &photo.image) {
        Ok(analysis) => (StatusCode::OK, Json(analysis)).into_response(),
        Err(error) => failure(error),
    }
}
