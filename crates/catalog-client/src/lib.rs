//! Client-side building blocks for the catalog front end.
//!
//! - [`session::AuthSession`] mirrors the ambient identity provider and owns the
//!   profile / account flows.
//! - [`guard`] decides whether a navigation may proceed.
//! - [`form`] and [`rules`] implement declarative field validation.
//! - [`toast::ToastRegistry`] holds transient notifications.
//!
//! The identity provider and document store are reached only through the
//! traits in [`provider`].

pub mod error;
pub mod form;
pub mod guard;
pub mod provider;
pub mod rules;
pub mod session;
pub mod toast;
