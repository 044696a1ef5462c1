// src/infrastructure/security/authorization_code_store.rs
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::authorization_code::{AuthorizationCodeStore, Redemption};
use crate::domain::authorization_code::{AuthorizationCode, RedemptionFailure};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Process-local code store. Suitable for a single instance; use the Redis
/// store when more than one process serves traffic.
#[derive(Default)]
pub struct InMemoryAuthorizationCodeStore {
    // code -> AuthorizationCode
    inner: Mutex<HashMap<String, AuthorizationCode>>,
}

impl InMemoryAuthorizationCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ApplicationResult<MutexGuard<'_, HashMap<String, AuthorizationCode>>> {
        self.inner
            .lock()
            .map_err(|_| ApplicationError::infrastructure("authorization code store poisoned"))
    }
}

#[async_trait]
impl AuthorizationCodeStore for InMemoryAuthorizationCodeStore {
    async fn save(&self, code: AuthorizationCode) -> ApplicationResult<()> {
        let mut guard = self.lock()?;
        guard.insert(code.code.clone(), code);
        Ok(())
    }

    async fn validate_and_consume(
        &self,
        code: &str,
        client_id: &str,
        redirect_uri: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<Redemption> {
        // Check and mark under a single lock acquisition.
        let mut guard = self.lock()?;
        let Some(record) = guard.get_mut(code) else {
            return Ok(Redemption::Refused(RedemptionFailure::Unknown));
        };
        if let Err(reason) = record.check_redeemable(client_id, redirect_uri, now) {
            return Ok(Redemption::Refused(reason));
        }
        record.consume();
        Ok(Redemption::Redeemed(record.clone()))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> ApplicationResult<usize> {
        let mut guard = self.lock()?;
        let before = guard.len();
        guard.retain(|_, record| !record.consumed && !record.is_expired(now));
        Ok(before - guard.len())
    }
}

pub fn into_arc(store: InMemoryAuthorizationCodeStore) -> Arc<dyn AuthorizationCodeStore> {
    Arc::new(store)
}
