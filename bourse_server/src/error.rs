//! Error type of the HTTP layer.
//!
//! Every handler returns `Result<_, AppError>`; the error renders itself as a
//! JSON body `{"success": false, "error": "<message>"}` with a matching status.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bourse_common::wire::ErrorResponse;
use log::{error, warn};
use thiserror::Error;

use crate::providers::ProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid or incomplete request.
    #[error("{0}")]
    BadRequest(String),

    /// Missing or rejected credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// A collaborator needed by the route is not configured.
    #[error("{0}")]
    Configuration(String),

    /// A collaborator failed or answered unexpectedly.
    #[error("{0}")]
    Upstream(String),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Configuration(_) | AppError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self);
        }

        let body = Json(ErrorResponse {
            success: false,
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
