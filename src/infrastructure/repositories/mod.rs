// src/infrastructure/repositories/mod.rs
mod error;
mod postgres_user_directory;

pub(crate) use error::map_sqlx;
pub use postgres_user_directory::{PostgresUserDirectory, is_plain_identifier};
