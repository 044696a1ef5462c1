// tests/support/mocks/directory.rs
use async_trait::async_trait;
use platform_oidc::domain::errors::{DomainError, DomainResult};
use platform_oidc::domain::user::{DirectoryUser, UserDirectory};

pub const USER_ID: &str = "42";
pub const USER_EXTERNAL_ID: &str = "nc-ada";
pub const USER_NAME: &str = "Ada Lovelace";
pub const USER_EMAIL: &str = "ada@example.org";

/// Subject that resolves to nobody.
pub const GHOST_SUBJECT: &str = "ghost";
/// Subject whose lookup fails like a broken database would.
pub const BROKEN_SUBJECT: &str = "broken";

pub fn sample_user() -> DirectoryUser {
    DirectoryUser::new(USER_ID, Some(USER_NAME.into()), Some(USER_EMAIL.into()))
}

/// One-member directory that also answers to the external identity.
pub struct StaticUserDirectory;

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn find_by_id_or_external_id(&self, subject: &str) -> DomainResult<Option<DirectoryUser>> {
        match subject {
            USER_ID | USER_EXTERNAL_ID => Ok(Some(sample_user())),
            BROKEN_SUBJECT => Err(DomainError::Persistence("connection reset".into())),
            _ => Ok(None),
        }
    }
}
