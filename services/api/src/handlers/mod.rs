pub mod auth;
pub mod health;
pub mod news;
pub mod product;
pub mod user;
