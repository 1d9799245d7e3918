//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kairan_shared::dto::{ErrorBodyDto, ErrorDetailDto};

use crate::usecase::{FetchHistoryError, MembershipError, PollError, SendMessageError};

pub const MISSING_CLIENT_ID: &str = "Missing client ID";
pub const MISSING_CLIENT_ID_OR_MESSAGE: &str = "Missing client ID or message";

/// Error rendered as `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "BAD_REQUEST",
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "NOT_FOUND",
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            code: "UNAVAILABLE",
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBodyDto {
            error: ErrorDetailDto {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<MembershipError> for ApiError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::InvalidClientId(e) => Self::bad_request(e.to_string()),
            MembershipError::Unavailable => Self::unavailable(err.to_string()),
        }
    }
}

impl From<SendMessageError> for ApiError {
    fn from(err: SendMessageError) -> Self {
        match err {
            SendMessageError::InvalidClientId(e) | SendMessageError::InvalidMessage(e) => {
                Self::bad_request(e.to_string())
            }
            SendMessageError::Unavailable => Self::unavailable(err.to_string()),
        }
    }
}

impl From<PollError> for ApiError {
    fn from(err: PollError) -> Self {
        match err {
            PollError::InvalidClientId(e) => Self::bad_request(e.to_string()),
            PollError::ClientNotFound(_) => Self::not_found(err.to_string()),
            PollError::Unavailable => Self::unavailable(err.to_string()),
        }
    }
}

impl From<FetchHistoryError> for ApiError {
    fn from(err: FetchHistoryError) -> Self {
        tracing::error!(?err, "failed to fetch history");
        Self::internal("Failed to retrieve chat history")
    }
}
