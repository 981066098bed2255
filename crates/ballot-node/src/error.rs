use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ballot_auth::{OtpError, PhoneError};
use ballot_core::LedgerError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Phone(#[from] PhoneError),

    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error("voter has not completed passcode verification")]
    Unauthenticated,

    #[error("unknown candidate {0}")]
    UnknownCandidate(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("vote task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Phone(_) | ApiError::Otp(_) | ApiError::UnknownCandidate(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Ledger(_) | ApiError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
