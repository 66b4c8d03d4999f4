//! Owner-scoped CRUD, generic over any [`OwnedRepository`].
//!
//! Every use case takes the caller's id. Records owned by someone else surface
//! as `NotFound`, the same as records that do not exist.

use chrono::Utc;

use catalog_domain::id::UserId;
use catalog_domain::owned::OwnedRecord;

use crate::domain::repository::OwnedRepository;
use crate::error::ApiError;

type IdOf<S> = <<S as OwnedRepository>::Record as OwnedRecord>::Id;
type DraftOf<S> = <<S as OwnedRepository>::Record as OwnedRecord>::Draft;
type PatchOf<S> = <<S as OwnedRepository>::Record as OwnedRecord>::Patch;

fn not_found<S: OwnedRepository>() -> ApiError {
    ApiError::NotFound(<S::Record as OwnedRecord>::RESOURCE)
}

// ── ListOwned ────────────────────────────────────────────────────────────────

pub struct ListOwnedUseCase<S: OwnedRepository> {
    pub store: S,
}

impl<S: OwnedRepository> ListOwnedUseCase<S> {
    pub async fn execute(&self, owner: UserId) -> Result<Vec<S::Record>, ApiError> {
        self.store.list_by_owner(owner).await
    }
}

// ── GetOwned ─────────────────────────────────────────────────────────────────

pub struct GetOwnedUseCase<S: OwnedRepository> {
    pub store: S,
}

impl<S: OwnedRepository> GetOwnedUseCase<S> {
    pub async fn execute(&self, owner: UserId, id: IdOf<S>) -> Result<S::Record, ApiError> {
        self.store
            .find_owned(owner, id)
            .await?
            .ok_or_else(not_found::<S>)
    }
}

// ── CreateOwned ──────────────────────────────────────────────────────────────

pub struct CreateOwnedUseCase<S: OwnedRepository> {
    pub store: S,
}

impl<S: OwnedRepository> CreateOwnedUseCase<S> {
    pub async fn execute(&self, owner: UserId, draft: DraftOf<S>) -> Result<S::Record, ApiError> {
        let record = <S::Record as OwnedRecord>::from_draft(
            <S::Record as OwnedRecord>::new_id(),
            owner,
            draft,
            Utc::now(),
        );
        self.store.insert(&record).await?;
        tracing::debug!(
            resource = <S::Record as OwnedRecord>::RESOURCE,
            id = %record.id(),
            owner = %owner,
            "record created"
        );
        Ok(record)
    }
}

// ── UpdateOwned ──────────────────────────────────────────────────────────────

pub struct UpdateOwnedUseCase<S: OwnedRepository> {
    pub store: S,
}

impl<S: OwnedRepository> UpdateOwnedUseCase<S> {
    pub async fn execute(
        &self,
        owner: UserId,
        id: IdOf<S>,
        patch: PatchOf<S>,
    ) -> Result<S::Record, ApiError> {
        self.store
            .update_owned(owner, id, &patch)
            .await?
            .ok_or_else(not_found::<S>)
    }
}

// ── DeleteOwned ──────────────────────────────────────────────────────────────

pub struct DeleteOwnedUseCase<S: OwnedRepository> {
    pub store: S,
}

impl<S: OwnedRepository> DeleteOwnedUseCase<S> {
    /// Not idempotent: a second delete of the same id is `NotFound`.
    pub async fn execute(&self, owner: UserId, id: IdOf<S>) -> Result<(), ApiError> {
        if self.store.delete_owned(owner, id).await? {
            Ok(())
        } else {
            Err(not_found::<S>())
        }
    }
}
