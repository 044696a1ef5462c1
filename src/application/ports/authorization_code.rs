// src/application/ports/authorization_code.rs
use crate::application::ApplicationResult;
use crate::domain::authorization_code::{AuthorizationCode, RedemptionFailure};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub enum Redemption {
    Redeemed(AuthorizationCode),
    Refused(RedemptionFailure),
}

#[async_trait]
pub trait AuthorizationCodeStore: Send + Sync {
    async fn save(&self, code: AuthorizationCode) -> ApplicationResult<()>;

    /// Run the redemption checks and mark the code consumed as one atomic
    /// step. Two concurrent calls for the same code can never both observe
    /// `Redeemed`.
    async fn validate_and_consume(
        &self,
        code: &str,
        client_id: &str,
        redirect_uri: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<Redemption>;

    /// Drop expired and consumed records. Returns how many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> ApplicationResult<usize>;
}
