use axum::{
    Json,
    extract::{
        Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use core_types::{CoreError, ErrorEnvelope};
use database::DbError;
use thiserror::Error;

pub const CUSTOMER_NOT_FOUND: &str = "Customer not found";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Carries the error message from `AppError::into_response` to
/// [`error_envelope`], which knows the request it belongs to.
#[derive(Debug, Clone)]
struct ErrorMessage(String);

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(DbError::UniqueViolation(detail)) => {
                tracing::warn!(detail = %detail, "Unique constraint rejected the write.");
                (
                    StatusCode::CONFLICT,
                    "A customer with this identification already exists".to_string(),
                )
            }
            AppError::Database(DbError::ForeignKeyViolation(detail)) => {
                tracing::warn!(detail = %detail, "Foreign key constraint rejected the write.");
                (
                    StatusCode::CONFLICT,
                    "Customer still has billing records".to_string(),
                )
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::MethodNotAllowed(message) => (StatusCode::METHOD_NOT_ALLOWED, message),
        };

        let body = Json(serde_json::json!({ "status": "error", "message": message }));
        let mut response = (status, body).into_response();
        response.extensions_mut().insert(ErrorMessage(message));
        response
    }
}

/// Middleware that completes every error body with the request's endpoint
/// and method.
pub async fn error_envelope(request: Request, next: Next) -> Response {
    let endpoint = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let method = request.method().to_string();

    let response = next.run(request).await;
    let Some(ErrorMessage(message)) = response.extensions().get::<ErrorMessage>().cloned() else {
        return response;
    };

    let envelope = ErrorEnvelope {
        status: "error".to_string(),
        endpoint,
        method,
        message,
    };
    (response.status(), Json(envelope)).into_response()
}
