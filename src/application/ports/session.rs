use crate::application::{ApplicationResult, dto::SessionSubject};
use async_trait::async_trait;

#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Look up the subject behind an external session credential.
    /// `Ok(None)` means no active session.
    async fn resolve_session(&self, session_token: &str) -> ApplicationResult<Option<SessionSubject>>;
}
