//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

/// API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: msg.into(),
        }
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.into(),
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "code": self.status.as_u16()
            }
        }));
        (self.status, body).into_response()
    }
}

impl From<ohun_core::Error> for ApiError {
    fn from(err: ohun_core::Error) -> Self {
        use ohun_core::Error;

        warn!("Request failed: {}", err);
        match &err {
            Error::EmptyText
            | Error::EmptyAudio
            | Error::InvalidDataUri(_)
            | Error::UnsupportedFormat(_)
            | Error::DuplicateEntry(_) => ApiError::bad_request(err.to_string()),
            Error::InvalidSpeechPayload(_)
            | Error::MissingField { .. }
            | Error::HttpStatus { .. }
            | Error::Http(_) => ApiError::bad_gateway(err.to_string()),
            Error::Configuration(_) => ApiError::unavailable(err.to_string()),
            _ => ApiError::internal(err.to_string()),
        }
    }
}
