pub mod db;
pub mod news;
