// src/infrastructure/security/session_resolver.rs
use crate::application::ApplicationResult;
use crate::application::dto::SessionSubject;
use crate::application::error::ApplicationError;
use crate::application::ports::session::SessionResolver;
use async_trait::async_trait;
use deadpool_redis::{Config as DeadpoolConfig, Pool, Runtime};
use redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Reads sessions written by the platform's login service: the session
/// cookie value maps to `<prefix><token>` holding the subject id.
#[derive(Clone)]
pub struct RedisSessionResolver {
    pool: Pool,
    key_prefix: String,
}

impl RedisSessionResolver {
    pub fn from_url(url: &str, key_prefix: impl Into<String>) -> Result<Self, ApplicationError> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(Self {
            pool,
            key_prefix: key_prefix.into(),
        })
    }
}

#[async_trait]
impl SessionResolver for RedisSessionResolver {
    async fn resolve_session(&self, session_token: &str) -> ApplicationResult<Option<SessionSubject>> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        let key = format!("{}{}", self.key_prefix, session_token);
        let subject: Option<String> = conn
            .get(key)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(subject
            .filter(|s| !s.is_empty())
            .map(SessionSubject::new))
    }
}

/// Fixed session table for embedders and tests that run without Redis.
#[derive(Default)]
pub struct InMemorySessionResolver {
    sessions: RwLock<HashMap<String, String>>,
}

impl InMemorySessionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session_token: impl Into<String>, subject_id: impl Into<String>) {
        if let Ok(mut guard) = self.sessions.write() {
            guard.insert(session_token.into(), subject_id.into());
        }
    }
}

#[async_trait]
impl SessionResolver for InMemorySessionResolver {
    async fn resolve_session(&self, session_token: &str) -> ApplicationResult<Option<SessionSubject>> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| ApplicationError::infrastructure("session table poisoned"))?;
        Ok(guard.get(session_token).cloned().map(SessionSubject::new))
    }
}

pub fn into_arc<R: SessionResolver + 'static>(resolver: R) -> Arc<dyn SessionResolver> {
    Arc::new(resolver)
}
