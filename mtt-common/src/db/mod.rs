//! Database schema, models and typed queries

pub mod init;
pub mod models;
pub mod music;
pub mod ratings;

pub use init::init_database;
pub use models::{Rating, Track};
