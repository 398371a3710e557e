use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::LeadStatus;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not authenticated: {0}")]
    Authentication(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Invalid lead transition from {from} to {to}")]
    InvalidLeadTransition { from: LeadStatus, to: LeadStatus },

    #[error("Lead not verified yet")]
    LeadNotVerified,

    #[error("Lead already purchased")]
    LeadAlreadyPurchased,

    #[error("Invalid payment code")]
    InvalidPaymentCode,

    #[error("An active invitation already exists for this lead")]
    DuplicateInvitation,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error body returned to clients. The frontend reads `detail`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: String,
    pub error_code: String,
}

impl ApiError {
    pub fn new(error_code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            error_code: error_code.into(),
        }
    }
}

// HTTP status code mapping
impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::NotAuthorized(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_)
            | AppError::LeadNotVerified
            | AppError::InvalidPaymentCode => StatusCode::BAD_REQUEST,
            AppError::InvalidLeadTransition { .. }
            | AppError::LeadAlreadyPurchased
            | AppError::DuplicateInvitation
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Authentication(_) => "AUTHENTICATION_ERROR",
            AppError::NotAuthorized(_) => "NOT_AUTHORIZED",
            AppError::InvalidLeadTransition { .. } => "INVALID_LEAD_TRANSITION",
            AppError::LeadNotVerified => "LEAD_NOT_VERIFIED",
            AppError::LeadAlreadyPurchased => "LEAD_ALREADY_PURCHASED",
            AppError::InvalidPaymentCode => "INVALID_PAYMENT_CODE",
            AppError::DuplicateInvitation => "DUPLICATE_INVITATION",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("{} {}", entity, id))
    }

    pub fn invalid_transition(from: LeadStatus, to: LeadStatus) -> Self {
        AppError::InvalidLeadTransition { from, to }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = match &self {
            AppError::Database(err) => {
                tracing::error!(error = ?err, "Database error occurred");
                "An internal database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error occurred");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ApiError::new(self.error_code(), detail))).into_response()
    }
}
