//! Session tokens: HS256 JWTs carrying `{ sub, exp }`.

use std::sync::Arc;
#[cfg(any(feature = "TOKEN_ISSUER", test))]
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "TOKEN_ISSUER", test))]
use serde::Serialize;

use catalog_domain::id::UserId;

/// Session-token lifetime in seconds (7 days).
pub const SESSION_TOKEN_EXP: u64 = 7 * 24 * 60 * 60;

/// HMAC secret shared by the token issuer and every verifier.
///
/// Cheap to clone; handlers receive it through axum `FromRef`.
#[derive(Clone)]
pub struct JwtSecret(Arc<str>);

impl JwtSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JwtSecret(..)")
    }
}

/// Identity extracted from a validated session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub user_id: UserId,
    pub exp: u64,
}

/// Errors returned by [`validate_session_token`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user id (UUID string) |
/// | `exp` | `exp` | expiry, seconds since epoch |
///
/// [`Serialize`] is only derived with the **`TOKEN_ISSUER`** feature; the API
/// service is the sole issuer, everyone else only validates.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "TOKEN_ISSUER", test), derive(Serialize))]
pub struct SessionClaims {
    pub sub: String,
    pub exp: u64,
}

#[cfg(any(feature = "TOKEN_ISSUER", test))]
pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Validate a session token and return the subject.
///
/// HS256 only; `exp` and `sub` are required. jsonwebtoken's default 60s leeway
/// applies to `exp`.
pub fn validate_session_token(token: &str, secret: &JwtSecret) -> Result<TokenInfo, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    let user_id = data
        .claims
        .sub
        .parse::<UserId>()
        .map_err(|_| TokenError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        exp: data.claims.exp,
    })
}

/// Sign a session token for `user_id` valid for [`SESSION_TOKEN_EXP`] seconds.
///
/// Returns the token and its expiry (seconds since epoch).
#[cfg(any(feature = "TOKEN_ISSUER", test))]
pub fn issue_session_token(user_id: UserId, secret: &JwtSecret) -> Result<(String, u64), TokenError> {
    let exp = now_secs() + SESSION_TOKEN_EXP;
    let token = sign_claims(
        &SessionClaims {
            sub: user_id.to_string(),
            exp,
        },
        secret,
    )?;
    Ok((token, exp))
}

/// Sign arbitrary claims. Exposed for tests that need expired or foreign tokens.
#[cfg(any(feature = "TOKEN_ISSUER", test))]
pub fn sign_claims(claims: &SessionClaims, secret: &JwtSecret) -> Result<String, TokenError> {
    use jsonwebtoken::{EncodingKey, Header, encode};

    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}
