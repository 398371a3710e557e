pub mod admin;
pub mod events;
pub mod mentor;
pub mod user;

use axum::{http::StatusCode, response::Json};

use leadbridge_common::ApiError;

use crate::models::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn handler_404() -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new("NOT_FOUND", "Endpoint not found")),
    )
}
