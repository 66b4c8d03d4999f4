//! Mock auth helpers for integration tests.
//!
//! Protected routes read `Authorization: Bearer <jwt>`. `MockAuth` signs tokens
//! with the test secret so requests can skip the register/login round trip.

use catalog_auth_types::token::{JwtSecret, SessionClaims, issue_session_token, sign_claims};
use catalog_domain::id::UserId;

/// Identity to authenticate test requests as.
pub struct MockAuth {
    pub user_id: UserId,
    secret: JwtSecret,
}

impl MockAuth {
    pub fn new(user_id: UserId, secret: JwtSecret) -> Self {
        Self { user_id, secret }
    }

    /// A valid session token for `user_id`.
    pub fn token(&self) -> String {
        issue_session_token(self.user_id, &self.secret)
            .expect("sign test token")
            .0
    }

    /// A correctly signed token that expired long ago.
    pub fn expired_token(&self) -> String {
        let claims = SessionClaims {
            sub: self.user_id.to_string(),
            exp: 1_000_000,
        };
        sign_claims(&claims, &self.secret).expect("sign expired test token")
    }
}
