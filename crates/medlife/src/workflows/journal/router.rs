use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::activity::NewActivitySession;
use super::domain::RecordId;
use super::glucose::NewGlucoseReading;
use super::medication::{DoseIntake, NewMedication};
use super::nutrition::NewMeal;
use super::period::StatsPeriod;
use super::repository::JournalRepository;
use super::service::{JournalService, JournalServiceError};
use crate::workflows::http::{error_response, success_response, today};
use crate::workflows::subjects::{RepositoryError, SubjectId, SubjectRepository};

type SharedJournal<S, J> = Arc<JournalService<S, J>>;

#[derive(Debug, Deserialize)]
pub(crate) struct StatsQuery {
    period: StatsPeriod,
    #[serde(default)]
    date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MealQuery {
    #[serde(default)]
    period: Option<StatsPeriod>,
    #[serde(default)]
    date: Option<NaiveDate>,
}

/// Journal endpoints, nested under a subject.
pub fn journal_router<S, J>(service: SharedJournal<S, J>) -> Router
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/subjects/:subject_id/glucose",
            post(record_glucose::<S, J>),
        )
        .route(
            "/api/v1/subjects/:subject_id/glucose/stats",
            get(glucose_stats::<S, J>),
        )
        .route(
            "/api/v1/subjects/:subject_id/glucose/:record_id",
            delete(delete_glucose::<S, J>),
        )
        .route(
            "/api/v1/subjects/:subject_id/activity",
            post(record_activity::<S, J>),
        )
        .route(
            "/api/v1/subjects/:subject_id/activity/stats",
            get(activity_stats::<S, J>),
        )
        .route(
            "/api/v1/subjects/:subject_id/meals",
            post(record_meal::<S, J>).get(list_meals::<S, J>),
        )
        .route(
            "/api/v1/subjects/:subject_id/meals/:record_id",
            delete(delete_meal::<S, J>),
        )
        .route(
            "/api/v1/subjects/:subject_id/medications",
            post(add_medication::<S, J>).get(list_medications::<S, J>),
        )
        .route(
            "/api/v1/subjects/:subject_id/medications/stats",
            get(medication_stats::<S, J>),
        )
        .route(
            "/api/v1/subjects/:subject_id/medications/:record_id",
            put(update_medication::<S, J>).delete(deactivate_medication::<S, J>),
        )
        .route(
            "/api/v1/subjects/:subject_id/medications/:record_id/take",
            post(take_dose::<S, J>),
        )
        .with_state(service)
}

fn failure(error: JournalServiceError) -> Response {
    let status = match &error {
        JournalServiceError::SubjectNotFound | JournalServiceError::MedicationNotFound => {
            StatusCode::NOT_FOUND
        }
        JournalServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        JournalServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        JournalServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        JournalServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, error)
}

async fn record_glucose<S, J>(
    State(service): State<SharedJournal<S, J>>,
    Path(subject_id): Path<String>,
    Json(reading): Json<NewGlucoseReading>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    match service.record_glucose(&SubjectId(subject_id), reading, Utc::now()) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => failure(error),
    }
}

async fn glucose_stats<S, J>(
    State(service): State<SharedJournal<S, J>>,
    Path(subject_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    let target = query.date.unwrap_or_else(today);
    match service.glucose_stats(&SubjectId(subject_id), query.period, target) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => failure(error),
    }
}

async fn delete_glucose<S, J>(
    State(service): State<SharedJournal<S, J>>,
    Path((subject_id, record_id)): Path<(String, String)>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    match service.delete_glucose(&SubjectId(subject_id), &RecordId(record_id)) {
        Ok(true) => success_response(StatusCode::OK),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "glucose reading not found"),
        Err(error) => failure(error),
    }
}

async fn record_activity<S, J>(
    State(service): State<SharedJournal<S, J>>,
    Path(subject_id): Path<String>,
    Json(session): Json<NewActivitySession>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    match service.record_activity(&SubjectId(subject_id), session, Utc::now()) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => failure(error),
    }
}

async fn activity_stats<S, J>(
    State(service): State<SharedJournal<S, J>>,
    Path(subject_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    let target = query.date.unwrap_or_else(today);
    match service.activity_stats(&SubjectId(subject_id), query.period, target) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => failure(error),
    }
}

async fn record_meal<S, J>(
    State(service): State<SharedJournal<S, J>>,
    Path(subject_id): Path<String>,
    Json(meal): Json<NewMeal>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    match service.record_meal(&SubjectId(subject_id), meal, Utc::now()) {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(error) => failure(error),
    }
}

async fn list_meals<S, J>(
    State(service): State<SharedJournal<S, J>>,
    Path(subject_id): Path<String>,
    Query(query): Query<MealQuery>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    let target = query.date.unwrap_or_else(today);
    match service.meals(&SubjectId(subject_id), query.period, target) {
        Ok(meals) => (StatusCode::OK, Json(meals)).into_response(),
        Err(error) => failure(error),
    }
}

async fn delete_meal<S, J>(
    State(service): State<SharedJournal<S, J>>,
    Path((subject_id, record_id)): Path<(String, String)>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    match service.delete_meal(&SubjectId(subject_id), &RecordId(record_id)) {
        Ok(true) => success_response(StatusCode::OK),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "meal not found"),
        Err(error) => failure(error),
    }
}

async fn add_medication<S, J>(
    State(service): State<SharedJournal<S, J>>,
    Path(subject_id): Path<String>,
    Json(medication): Json<NewMedication>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    match service.add_medication(&SubjectId(subject_id), medication, Utc::now()) {
        Ok(medication) => (StatusCode::CREATED, Json(medication)).into_response(),
        Err(error) => failure(error),
    }
}

async fn list_medications<S, J>(
    State(service): State<SharedJournal<S, J>>,
    Path(subject_id): Path<String>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    match service.active_medications(&SubjectId(subject_id)) {
        Ok(medications) => (StatusCode::OK, Json(medications)).into_response(),
        Err(error) => failure(error),
    }
}

async fn update_medication<S, J>(
    State(service): State<SharedJournal<S, J>>,
    Path((subject_id, record_id)): Path<(String, String)>,
    Json(update): Json<NewMedication>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    match service.update_medication(&SubjectId(subject_id), &RecordId(record_id), update) {
        Ok(medication) => (StatusCode::OK, Json(medication)).into_response(),
        Err(error) => failure(error),
    }
}

async fn deactivate_medication<S, J>(
    State(service): State<SharedJournal<S, J>>,
    Path((subject_id, record_id)): Path<(String, String)>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    match service.deactivate_medication(&SubjectId(subject_id), &RecordId(record_id)) {
        Ok(true) => success_response(StatusCode::OK),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "medication not found"),
        Err(error) => failure(error),
    }
}

async fn take_dose<S, J>(
    State(service): State<SharedJournal<S, J>>,
    Path((subject_id, record_id)): Path<(String, String)>,
    Json(intake): Json<DoseIntake>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    match service.record_dose(
        &SubjectId(subject_id),
        &RecordId(record_id),
        intake,
        Utc::now(),
    ) {
        Ok(medication) => (StatusCode::OK, Json(medication)).into_response(),
        Err(error) => failure(error),
    }
}

async fn medication_stats<S, J>(
    State(service): State<SharedJournal<S, J>>,
    Path(subject_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Response
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
{
    let target = query.date.unwrap_or_else(today);
    match service.medication_stats(&SubjectId(subject_id), query.period, target) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => failure(error),
    }
}
