// src/application/codes.rs
use crate::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::{
        authorization_code::{AuthorizationCodeStore, Redemption},
        security::CodeGenerator,
        time::Clock,
    },
};
use crate::domain::authorization_code::{AuthorizationCode, CodeBinding};
use chrono::Duration;
use std::sync::Arc;

/// Issues single-use authorization codes and redeems them at most once.
pub struct AuthorizationCodeService {
    store: Arc<dyn AuthorizationCodeStore>,
    generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl AuthorizationCodeService {
    pub fn new(
        store: Arc<dyn AuthorizationCodeStore>,
        generator: Arc<dyn CodeGenerator>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            generator,
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn issue(
        &self,
        user_id: &str,
        client_id: &str,
        redirect_uri: &str,
        binding: CodeBinding,
    ) -> ApplicationResult<String> {
        let code = self.generator.generate();
        let record = AuthorizationCode::new(
            code.clone(),
            user_id,
            client_id,
            redirect_uri,
            binding,
            self.clock.now(),
            self.ttl,
        );
        self.store.save(record).await?;
        tracing::debug!(client_id, user_id, "authorization code issued");
        Ok(code)
    }

    /// Redeem a code. Every refusal surfaces as the same `invalid_grant`.
    pub async fn validate_and_consume(
        &self,
        code: &str,
        client_id: &str,
        redirect_uri: &str,
    ) -> ApplicationResult<AuthorizationCode> {
        let now = self.clock.now();
        match self
            .store
            .validate_and_consume(code, client_id, redirect_uri, now)
            .await?
        {
            Redemption::Redeemed(record) => Ok(record),
            Redemption::Refused(reason) => {
                tracing::debug!(client_id, reason = reason.as_str(), "authorization code refused");
                Err(ApplicationError::InvalidGrant)
            }
        }
    }

    pub async fn purge_expired(&self) -> ApplicationResult<usize> {
        self.store.purge_expired(self.clock.now()).await
    }
}
