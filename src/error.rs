// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::identity::IdentityError;
use crate::storage::StorageError;
use crate::validation::FieldError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub code: &'static str,
    pub details: Option<Vec<FieldError>>,
}

/// JSON error body returned by every failing endpoint.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
    /// Machine-readable code (`not_found`, `validation_failed`, ...)
    pub error_code: String,
    /// Per-field problems for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code,
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "validation_failed", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "conflict", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }

    /// `422` carrying the offending fields.
    pub fn validation(details: Vec<FieldError>) -> Self {
        let message = match details.as_slice() {
            [only] => format!("Invalid {}: {}", only.field, only.message),
            _ => "Request validation failed".to_string(),
        };
        Self {
            details: Some(details),
            ..Self::unprocessable(message)
        }
    }

    /// Failure reported by (or while reaching) the identity provider.
    pub fn upstream(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, "identity_provider_error", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.code.to_string(),
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => Self::not_found(format!("{what} not found")),
            StorageError::MissingReference(msg) | StorageError::Conflict(msg) => {
                Self::conflict(msg)
            }
            StorageError::Sqlite(_) | StorageError::Poisoned => {
                tracing::error!(error = %err, "Storage failure");
                Self::internal("Internal storage error")
            }
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::NotFound(id) => Self::not_found(format!("User {id} not found")),
            IdentityError::Rejected { status, message } => {
                tracing::warn!(status, error = %message, "Identity provider rejected request");
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                Self::upstream(status, message)
            }
            IdentityError::Request(_) | IdentityError::InvalidResponse(_) => {
                tracing::error!(error = %err, "Identity provider unreachable");
                Self::upstream(StatusCode::BAD_GATEWAY, err.to_string())
            }
            IdentityError::MissingConfig(_) => {
                tracing::error!(error = %err, "Identity provider misconfigured");
                Self::internal(err.to_string())
            }
        }
    }
}
