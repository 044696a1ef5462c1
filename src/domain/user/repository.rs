use crate::domain::errors::DomainResult;
use crate::domain::user::entity::DirectoryUser;
use async_trait::async_trait;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a subject by primary key first, then by the external identity
    /// column when the deployment has one.
    async fn find_by_id_or_external_id(&self, subject: &str) -> DomainResult<Option<DirectoryUser>>;
}
