#![allow(async_fn_in_trait)]

use catalog_domain::id::UserId;
use catalog_domain::owned::OwnedRecord;

use crate::domain::types::{NewsItem, ProfilePatch, User};
use crate::error::ApiError;

/// Repository for registered accounts.
pub trait UserRepository: Send + Sync {
    /// Exact, case-sensitive match.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError>;
    /// Fails with `DuplicateEmail` when the email is already taken.
    async fn create(&self, user: &User) -> Result<(), ApiError>;
    /// Apply `patch` and bump `updated_at`. `None` when the user does not exist.
    async fn update_profile(
        &self,
        id: UserId,
        patch: &ProfilePatch,
    ) -> Result<Option<User>, ApiError>;
}

/// Store for records scoped to a single owner.
///
/// Every single-record operation takes the caller's id and only ever touches a
/// record whose owner matches. A foreign record is reported exactly like a
/// missing one (`None` / `false`).
pub trait OwnedRepository: Send + Sync {
    type Record: OwnedRecord;

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Self::Record>, ApiError>;

    async fn find_owned(
        &self,
        owner: UserId,
        id: <Self::Record as OwnedRecord>::Id,
    ) -> Result<Option<Self::Record>, ApiError>;

    async fn insert(&self, record: &Self::Record) -> Result<(), ApiError>;

    /// Ownership check and write happen atomically.
    async fn update_owned(
        &self,
        owner: UserId,
        id: <Self::Record as OwnedRecord>::Id,
        patch: &<Self::Record as OwnedRecord>::Patch,
    ) -> Result<Option<Self::Record>, ApiError>;

    /// Returns `true` if a row was deleted.
    async fn delete_owned(
        &self,
        owner: UserId,
        id: <Self::Record as OwnedRecord>::Id,
    ) -> Result<bool, ApiError>;
}

/// Upstream provider of design headlines.
pub trait NewsSource: Send + Sync {
    async fn fetch_design_news(&self) -> anyhow::Result<Vec<NewsItem>>;
}
