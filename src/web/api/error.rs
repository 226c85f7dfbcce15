use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::ConfigError;
use crate::observer::ConfigurationError;
use crate::visibility::VisibilityError;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    Propagation(String),
    Internal(String),
}

impl From<ConfigError> for ApiError {
    fn from(e: ConfigError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<ConfigurationError> for ApiError {
    fn from(e: ConfigurationError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<VisibilityError> for ApiError {
    fn from(e: VisibilityError) -> Self {
        match e {
            VisibilityError::Configuration(e) => e.into(),
            VisibilityError::Catalog(e) if e.is_lookup() => ApiError::NotFound(e.to_string()),
            VisibilityError::Catalog(e) => ApiError::Internal(e.to_string()),
            e @ VisibilityError::Propagation { .. } => ApiError::Propagation(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_failed", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "satellite_not_found", msg),
            ApiError::Propagation(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "propagation_failed", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };
        let body = ErrorResponse {
            error: error.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;

    #[test]
    fn maps_errors_to_status_codes() {
        let status = |e: ApiError| e.into_response().status();

        let missing = VisibilityError::Catalog(CatalogError::NotFound("X".into()));
        assert_eq!(status(missing.into()), StatusCode::NOT_FOUND);

        let invalid = VisibilityError::Configuration(ConfigurationError::MissingFov);
        assert_eq!(status(invalid.into()), StatusCode::BAD_REQUEST);

        let empty = VisibilityError::Catalog(CatalogError::Empty("stations".into()));
        assert_eq!(status(empty.into()), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
