use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use catalog_auth_types::identity::BearerRejection;
use catalog_core::error::error_response;

/// API domain error variants.
///
/// `NotFound` covers both absent records and records owned by another user.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("User with this email already exists")]
    DuplicateEmail,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Not authorized, no token provided")]
    MissingToken,
    #[error("Not authorized, invalid token")]
    InvalidToken,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("No fields to update")]
    MissingData,
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::MissingData => "MISSING_DATA",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::DuplicateEmail | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::MissingToken | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BearerRejection> for ApiError {
    fn from(rejection: BearerRejection) -> Self {
        match rejection {
            BearerRejection::MissingToken => Self::MissingToken,
            BearerRejection::InvalidToken => Self::InvalidToken,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), self.to_string())
    }
}
