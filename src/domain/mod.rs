// src/domain/mod.rs
pub mod authorization_code;
pub mod client;
pub mod errors;
pub mod pkce;
pub mod user;
