//! Client-facing error taxonomy and JSON response helpers
//!
//! Not-found carries a fixed contract: status 404 with a body of
//! `{"type": "EntityNotFoundException", "message": "<Kind> with id <key> not found"}`.
//! The other variants have no fixed body shape and use the generic
//! `{"error": ..., "code": ...}` form.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;
use tracing::warn;

use crate::types::RegistrarError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{kind} with id {key} not found")]
    NotFound { kind: &'static str, key: String },

    #[error("{message}")]
    Unauthorized {
        message: String,
        code: &'static str,
    },

    #[error("{message}")]
    Forbidden { message: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Internal error: {message}")]
    Fault { message: String },
}

impl ApiError {
    pub fn not_found(kind: &'static str, key: impl Display) -> Self {
        ApiError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn no_token() -> Self {
        ApiError::Unauthorized {
            message: "No token provided".to_string(),
            code: "NO_TOKEN",
        }
    }

    pub fn invalid_token(detail: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            message: detail.into(),
            code: "INVALID_TOKEN",
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Fault { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Translate into the HTTP response the client sees
    pub fn to_response(&self) -> Response<Full<Bytes>> {
        match self {
            ApiError::NotFound { .. } => json_response(
                StatusCode::NOT_FOUND,
                &NotFoundBody {
                    error_type: "EntityNotFoundException",
                    message: self.to_string(),
                },
            ),
            ApiError::Unauthorized { message, code } => {
                error_response(StatusCode::UNAUTHORIZED, message, Some(code))
            }
            ApiError::Forbidden { message } => {
                error_response(StatusCode::FORBIDDEN, message, Some("FORBIDDEN"))
            }
            ApiError::Validation { message } => {
                error_response(StatusCode::BAD_REQUEST, message, None)
            }
            ApiError::Unavailable { message } => {
                warn!("Store unavailable: {}", message);
                error_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Database not available",
                    Some("DB_UNAVAILABLE"),
                )
            }
            ApiError::Fault { message } => {
                warn!("Internal error: {}", message);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
        }
    }
}

impl From<RegistrarError> for ApiError {
    fn from(e: RegistrarError) -> Self {
        ApiError::Fault {
            message: e.to_string(),
        }
    }
}

/// Fixed not-found payload
#[derive(Debug, Serialize)]
struct NotFoundBody {
    #[serde(rename = "type")]
    error_type: &'static str,
    message: String,
}

/// Generic error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Confirmation message body (delete)
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(json)))
        .unwrap()
}

pub fn error_response(status: StatusCode, error: &str, code: Option<&str>) -> Response<Full<Bytes>> {
    json_response(
        status,
        &ErrorResponse {
            error: error.to_string(),
            code: code.map(|c| c.to_string()),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_contract() {
        let err = ApiError::not_found("HelpRequest", 7);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "HelpRequest with id 7 not found");

        let response = err.to_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_found_body_shape() {
        let body = NotFoundBody {
            error_type: "EntityNotFoundException",
            message: "Article with id 15 not found".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "EntityNotFoundException");
        assert_eq!(json["message"], "Article with id 15 not found");
    }

    #[test]
    fn test_statuses() {
        assert_eq!(ApiError::no_token().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::invalid_token("expired").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::forbidden("nope").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::validation("bad date").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_code_omitted_when_absent() {
        let body = ErrorResponse {
            error: "bad".to_string(),
            code: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("code"));
    }
}
