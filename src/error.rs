// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::{
    blockchain::{DerivationError, TransferSubmissionFailure},
    session::SessionError,
    wallet::SeedError,
};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(error = %message, "Internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Destructive operations must be confirmed explicitly.
    pub fn confirmation_required(action: &str) -> Self {
        Self::conflict(format!("{action} destroys the current seed; resend with confirm=true"))
    }
}

impl From<SeedError> for ApiError {
    fn from(err: SeedError) -> Self {
        match err {
            SeedError::InvalidMnemonic(_) => Self::bad_request(err.to_string()),
            // The link base comes from server configuration.
            SeedError::InvalidLink(_) | SeedError::Persistence(_) => {
                Self::internal(err.to_string())
            }
        }
    }
}

impl From<DerivationError> for ApiError {
    fn from(err: DerivationError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Seed(e) => e.into(),
            SessionError::Derivation(e) => e.into(),
        }
    }
}

impl From<TransferSubmissionFailure> for ApiError {
    fn from(err: TransferSubmissionFailure) -> Self {
        Self::bad_gateway(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
