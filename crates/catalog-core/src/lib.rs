//! Service plumbing shared by catalog HTTP services: the JSON error envelope,
//! request-id / CORS / panic layers, tracing setup and serde helpers.

pub mod error;
pub mod middleware;
pub mod serde;
pub mod tracing;
