use chrono::Utc;

use catalog_auth_types::token::{JwtSecret, issue_session_token};
use catalog_domain::id::UserId;

use crate::domain::password::{hash_password, verify_password};
use crate::domain::repository::UserRepository;
use crate::domain::types::{ProfilePatch, User};
use crate::error::ApiError;

/// A user together with a freshly issued session token.
#[derive(Debug)]
pub struct AuthOutput {
    pub user: User,
    pub token: String,
}

fn issue_for(user: User, secret: &JwtSecret) -> Result<AuthOutput, ApiError> {
    let (token, _exp) =
        issue_session_token(user.id, secret).map_err(|e| ApiError::Internal(e.into()))?;
    Ok(AuthOutput { user, token })
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

pub struct RegisterUseCase<R: UserRepository> {
    pub users: R,
    pub jwt_secret: JwtSecret,
}

impl<R: UserRepository> RegisterUseCase<R> {
    pub async fn execute(&self, input: RegisterInput) -> Result<AuthOutput, ApiError> {
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(ApiError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = User {
            id: UserId::generate(),
            email: input.email,
            password_hash: hash_password(&input.password)?,
            first_name: input.first_name,
            last_name: input.last_name,
            phone: input.phone,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;

        tracing::info!(user_id = %user.id, "user registered");
        issue_for(user, &self.jwt_secret)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<R: UserRepository> {
    pub users: R,
    pub jwt_secret: JwtSecret,
}

impl<R: UserRepository> LoginUseCase<R> {
    /// Unknown email and wrong password fail identically.
    pub async fn execute(&self, input: LoginInput) -> Result<AuthOutput, ApiError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(ApiError::InvalidCredentials);
        }

        issue_for(user, &self.jwt_secret)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: UserId) -> Result<User, ApiError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::NotFound("User"))
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> UpdateProfileUseCase<R> {
    pub async fn execute(&self, user_id: UserId, patch: ProfilePatch) -> Result<User, ApiError> {
        if patch.is_empty() {
            return Err(ApiError::MissingData);
        }
        self.users
            .update_profile(user_id, &patch)
            .await?
            .ok_or(ApiError::NotFound("User"))
    }
}
