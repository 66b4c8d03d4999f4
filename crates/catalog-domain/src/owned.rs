//! Records scoped to exactly one owning user.
//!
//! An [`OwnedRecord`] carries an immutable owner id stamped at creation. Stores
//! built on top of it must check the owner on every single-record read and
//! every mutation, and report a foreign record exactly like a missing one.

use chrono::{DateTime, Utc};

use crate::id::UserId;

/// A persisted entity owned by one user.
pub trait OwnedRecord: Clone + Send + Sync + 'static {
    /// Record identifier.
    type Id: Copy + Eq + Send + Sync + std::fmt::Debug + std::fmt::Display + 'static;
    /// Caller-supplied fields for a new record.
    type Draft: Send + Sync;
    /// Partial update; absent fields are left untouched.
    type Patch: Send + Sync;

    /// Human-readable resource name used in not-found messages (e.g. `"Product"`).
    const RESOURCE: &'static str;

    fn id(&self) -> Self::Id;

    fn owner_id(&self) -> UserId;

    /// Allocate a fresh record id.
    fn new_id() -> Self::Id;

    /// Build a record owned by `owner` with `created_at = updated_at = now`.
    fn from_draft(id: Self::Id, owner: UserId, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Apply `patch` in place and set `updated_at = now`. Never touches the owner.
    fn apply_patch(&mut self, patch: &Self::Patch, now: DateTime<Utc>);

    fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id() == user
    }
}
