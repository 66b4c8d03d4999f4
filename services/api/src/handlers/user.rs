use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use catalog_auth_types::identity::BearerIdentity;

use crate::domain::types::{ProfilePatch, User};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::auth::{GetUserUseCase, UpdateProfileUseCase};

/// Public view of a user. Never carries the password hash.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    #[serde(serialize_with = "catalog_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "catalog_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct UserEnvelope {
    pub status: &'static str,
    pub user: UserResponse,
}

impl UserEnvelope {
    fn success(user: User) -> Self {
        Self {
            status: "success",
            user: user.into(),
        }
    }
}

// ── GET /api/users ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: BearerIdentity,
    State(state): State<AppState>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(UserEnvelope::success(user)))
}

// ── PATCH /api/users ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

pub async fn update_me(
    identity: BearerIdentity,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(
            identity.user_id,
            ProfilePatch {
                first_name: body.first_name,
                last_name: body.last_name,
                phone: body.phone,
            },
        )
        .await?;
    Ok(Json(UserEnvelope::success(user)))
}
