//! `Authorization: Bearer <token>` extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::{Authorization, Bearer};
use axum_extra::headers::Header;
use http::StatusCode;
use http::header::AUTHORIZATION;
use http::request::Parts;

use catalog_core::error::error_response;
use catalog_domain::id::UserId;

use crate::token::{JwtSecret, validate_session_token};

/// Caller identity proven by a valid session token.
///
/// Requires [`JwtSecret`] to be reachable from the router state via `FromRef`.
/// Rejects with 401 when the header is missing, not a bearer credential,
/// badly signed, malformed or expired.
#[derive(Debug, Clone, Copy)]
pub struct BearerIdentity {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BearerRejection {
    #[error("Not authorized, no token provided")]
    MissingToken,
    #[error("Not authorized, invalid token")]
    InvalidToken,
}

impl BearerRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
        }
    }
}

impl IntoResponse for BearerRejection {
    fn into_response(self) -> Response {
        error_response(StatusCode::UNAUTHORIZED, self.kind(), self.to_string())
    }
}

impl<S> FromRequestParts<S> for BearerIdentity
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = BearerRejection;

    // axum-core 0.5 declares this as `fn -> impl Future + Send`. Everything is
    // read synchronously so the returned future borrows nothing from `parts`.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let bearer = Authorization::<Bearer>::decode(&mut parts.headers.get_all(AUTHORIZATION).iter());
        let result = match bearer {
            Err(_) => Err(BearerRejection::MissingToken),
            Ok(auth) => validate_session_token(auth.token(), &secret)
                .map(|info| Self {
                    user_id: info.user_id,
                })
                .map_err(|e| {
                    tracing::debug!(error = %e, "rejected bearer token");
                    BearerRejection::InvalidToken
                }),
        };

        async move { result }
    }
}
