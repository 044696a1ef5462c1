use crate::application::codes::AuthorizationCodeService;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;

/// Periodically drop expired and consumed codes. Storage hygiene only:
/// redemption checks expiry on its own.
pub fn spawn_code_sweeper(codes: Arc<AuthorizationCodeService>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            match codes.purge_expired().await {
                Ok(0) => {}
                Ok(count) => tracing::info!(count, "purged stale authorization codes"),
                Err(err) => tracing::error!(error = %err, "authorization code sweep failed"),
            }
        }
    })
}
