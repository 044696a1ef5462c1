pub mod auth;
pub mod authorize;
pub mod sessions;
pub mod users;

pub use auth::{IdTokenClaims, TokenRequest, TokenResponse};
pub use authorize::{AuthorizeOutcome, AuthorizeRequest};
pub use sessions::SessionSubject;
pub use users::UserInfoDto;
