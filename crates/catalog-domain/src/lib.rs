//! Domain types shared across catalog crates.
//!
//! Pure types with no framework dependencies: typed ids and the
//! [`owned::OwnedRecord`] contract for records scoped to a single user.

pub mod id;
pub mod owned;
