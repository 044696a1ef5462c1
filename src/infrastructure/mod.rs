pub mod database;
pub mod jobs;
pub mod repositories;
pub mod security;
pub mod time;
