//! API error types with HTTP response mapping.
//!
//! Every failure leaving a handler is turned into `{ "message": ... }` with a
//! matching status code here, and nowhere else.

use std::any::Any;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{RecipeError, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Message sent for every 500; details only go to the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Path parameters or request body failed validation.
    #[error("Invalid data: {0}")]
    Validation(String),

    /// No route matched.
    #[error("{0}")]
    NotFound(String),

    /// Recipe service error.
    #[error(transparent)]
    Recipe(RecipeError),

    /// Anything unexpected.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(_) => {
                tracing::debug!(error = %self, "request rejected by validation");
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Recipe(err) => recipe_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

fn recipe_error_to_response(err: RecipeError) -> (StatusCode, String) {
    match &err {
        RecipeError::RecipeNotFound(_) | RecipeError::IngredientNotFound { .. } => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        // Duplicate names and unrepresentable totals are plain client errors
        RecipeError::RecipeNameTaken(_)
        | RecipeError::IngredientNameTaken { .. }
        | RecipeError::TotalOutOfRange { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        RecipeError::Store(store_err) => {
            tracing::error!(error = %store_err, "store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            )
        }
    }
}

impl From<RecipeError> for ApiError {
    fn from(err: RecipeError) -> Self {
        metrics::counter!("recipe_operation_failures_total", "reason" => err.reason())
            .increment(1);
        ApiError::Recipe(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Router fallback for paths no route matches.
pub async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Renders a handler panic as the generic 500 response.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
