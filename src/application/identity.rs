use crate::application::{ApplicationResult, error::ApplicationError};
use crate::domain::user::{DirectoryUser, UserDirectory};

/// Resolve a subject to its directory record. A miss here means the session
/// or code points at a member the directory no longer knows, so it is logged
/// as an anomaly rather than treated as caller error.
pub async fn resolve_user(
    directory: &dyn UserDirectory,
    subject: &str,
) -> ApplicationResult<DirectoryUser> {
    match directory.find_by_id_or_external_id(subject).await? {
        Some(user) => Ok(user),
        None => {
            tracing::warn!(subject, "subject did not resolve to a directory user");
            Err(ApplicationError::user_not_found("user not found"))
        }
    }
}
