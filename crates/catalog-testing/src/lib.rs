//! Test utilities for the catalog crates.
//!
//! Provides `MockAuth` for minting bearer tokens and in-memory implementations
//! of the client provider traits. Import from tests only, never production code.

pub mod auth;
pub mod provider;
