mod authorize;
mod service;
mod token;

pub use service::OidcCommandService;
pub use token::{ID_TOKEN_TTL_SECS, TOKEN_TYPE_BEARER};
