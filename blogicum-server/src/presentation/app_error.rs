use crate::domain::error::DomainError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,
}

pub(crate) type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

// Identifiers that do not parse name no resource.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        debug!(reason = %rejection.body_text(), "unparseable path parameter");
        AppError::NotFound
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AppError::Domain(err) => match &err {
                DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
                DomainError::AlreadyExists(_) => (StatusCode::CONFLICT, err.to_string()),
                DomainError::InvalidCredentials => (StatusCode::UNAUTHORIZED, err.to_string()),
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                DomainError::Unexpected(detail) => {
                    error!(%detail, "unexpected domain error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error".to_string(),
                    )
                }
            },
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
        };

        (status, Json(ErrorBody { error: msg })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::AppError;
    use crate::domain::error::DomainError;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (
                AppError::from(DomainError::Validation {
                    field: "title",
                    message: "bad",
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(DomainError::NotFound("post id: 1".to_string())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(DomainError::AlreadyExists("username".to_string())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(DomainError::InvalidCredentials),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::from(DomainError::Unexpected("db down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::BadRequest("bad json".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::NotFound, StatusCode::NOT_FOUND),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
