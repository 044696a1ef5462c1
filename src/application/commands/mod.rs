pub mod oidc;

pub use oidc::OidcCommandService;
