pub mod auth;
pub mod news;
pub mod owned;
