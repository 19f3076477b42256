use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::images::ImageError;
use crate::store::StoreError;

/// Request-level failure taxonomy. Authorization and validation failures are
/// produced before any mutation; store and collaborator failures surface as a
/// generic internal error with the cause logged server-side only.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No or invalid session. Carries the login entry point (with callback
    /// target) for browser-facing clients when the route gate produced it.
    #[error("unauthorized")]
    Unauthorized { login: Option<String> },

    /// Authenticated but insufficient role or ownership.
    #[error("forbidden")]
    Forbidden,

    /// Referenced entity absent; the payload names the entity kind.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Missing or malformed required fields.
    #[error("{0}")]
    Validation(String),

    /// A status value outside its enumeration.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("internal server error")]
    Store(#[from] StoreError),

    #[error("internal server error")]
    Image(#[from] ImageError),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized { login: None }
    }

    /// Unauthorized with the login entry point preserved for the caller.
    pub fn login_required(callback: &str) -> Self {
        ApiError::Unauthorized {
            login: Some(format!("/login?callbackUrl={callback}")),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Unauthorized { login } => {
                let mut body = json!({ "error": "Unauthorized - Please login" });
                if let Some(login) = login {
                    body["login"] = json!(login);
                }
                (StatusCode::UNAUTHORIZED, body)
            }
            ApiError::Forbidden => (StatusCode::FORBIDDEN, json!({ "error": "Forbidden" })),
            ApiError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{entity} not found") }),
            ),
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::InvalidStatus(raw) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("Invalid status: {raw}") }),
            ),
            ApiError::Store(source) => {
                error!("store failure: {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
            ApiError::Image(source) => {
                error!("image host failure: {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            ApiError::unauthorized().into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("Property").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::validation("Title is required")
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidStatus("live".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
