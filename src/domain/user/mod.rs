// src/domain/user/mod.rs
pub mod entity;
pub mod repository;

pub use entity::DirectoryUser;
pub use repository::UserDirectory;
