pub mod auth_oidc;
pub mod discovery;
