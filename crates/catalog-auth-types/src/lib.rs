//! Auth types shared across catalog crates.
//!
//! Provides JWT issuing/validation and the `BearerIdentity` extractor that every
//! protected route uses to learn who is calling.

pub mod identity;
pub mod token;
