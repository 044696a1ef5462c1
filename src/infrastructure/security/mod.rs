// src/infrastructure/security/mod.rs
pub mod authorization_code_store;
pub mod random;
pub mod redis_authorization_code_store;
pub mod session_resolver;
pub mod token;
