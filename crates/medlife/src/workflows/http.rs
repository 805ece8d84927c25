use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Local, NaiveDate};
use serde_json::json;

/// JSON error body shared by every workflow router.
pub(crate) fn error_response(status: StatusCode, message: impl ToString) -> Response {
    let payload = json!({
        "success": false,
        "error": message.to_string(),
    });
    (status, Json(payload)).into_response()
}

pub(crate) fn success_response(status: StatusCode) -> Response {
    (status, Json(json!({ "success": true }))).into_response()
}

/// Calendar date used when a request omits one.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}
