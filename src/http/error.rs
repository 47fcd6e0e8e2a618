//! API error taxonomy, rendered as JSON `{"error": "<code>"}` bodies.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing_init_data")]
    MissingInitData,
    #[error("invalid_init_data")]
    InvalidInitData,
    #[error("invalid_user")]
    InvalidUser,
    #[error("already_claimed")]
    AlreadyClaimed,
    #[error("invalid_payload")]
    InvalidPayload,
    #[error("not_found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Machine-readable code exposed to the client. Internal failures leak
    /// only this fixed code; the chain goes to the server log.
    fn code(&self) -> &'static str {
        match self {
            ApiError::MissingInitData => "missing_init_data",
            ApiError::InvalidInitData => "invalid_init_data",
            ApiError::InvalidUser => "invalid_user",
            ApiError::AlreadyClaimed => "already_claimed",
            ApiError::InvalidPayload => "invalid_payload",
            ApiError::NotFound => "not_found",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingInitData | ApiError::InvalidInitData | ApiError::InvalidUser => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::AlreadyClaimed => StatusCode::CONFLICT,
            ApiError::InvalidPayload => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(e) = self {
            log::error!("request failed: {e:?}");
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.code() }))
    }
}
