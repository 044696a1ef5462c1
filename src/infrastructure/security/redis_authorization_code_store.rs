// src/infrastructure/security/redis_authorization_code_store.rs
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::authorization_code::{AuthorizationCodeStore, Redemption};
use crate::domain::authorization_code::{AuthorizationCode, RedemptionFailure};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::{Config as DeadpoolConfig, Connection, Pool, Runtime};
use redis::Script;

const DEFAULT_KEY_PREFIX: &str = "oidc:code:";

// Atomically runs the redemption checks in order and flips `consumed` on
// success. Replies with {'redeemed', payload} or {'refused', reason}.
const VALIDATE_AND_CONSUME: &str = r"
    local rec = redis.call('HMGET', KEYS[1], 'consumed', 'expires_at', 'client_id', 'redirect_uri', 'payload')
    if not rec[5] then
        return {'refused', 'unknown'}
    end
    if rec[1] == '1' then
        return {'refused', 'already_consumed'}
    end
    if tonumber(ARGV[1]) >= tonumber(rec[2]) then
        return {'refused', 'expired'}
    end
    if rec[3] ~= ARGV[2] then
        return {'refused', 'client_mismatch'}
    end
    if rec[4] ~= ARGV[3] then
        return {'refused', 'redirect_mismatch'}
    end
    redis.call('HSET', KEYS[1], 'consumed', '1')
    return {'redeemed', rec[5]}
";

/// Shared code store for deployments with more than one process. Records are
/// hashes keyed by a BLAKE3 digest of the code and expire with the code.
#[derive(Clone)]
pub struct RedisAuthorizationCodeStore {
    pool: Pool,
    key_prefix: String,
    script: Script,
}

impl RedisAuthorizationCodeStore {
    /// Create a store from a redis URL (e.g. redis://:password@host:6379/0)
    pub fn from_url(url: &str) -> Result<Self, ApplicationError> {
        Self::from_url_with_prefix(url, DEFAULT_KEY_PREFIX)
    }

    pub fn from_url_with_prefix(url: &str, key_prefix: &str) -> Result<Self, ApplicationError> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(Self {
            pool,
            key_prefix: key_prefix.to_string(),
            script: Script::new(VALIDATE_AND_CONSUME),
        })
    }

    fn key_for(&self, code: &str) -> String {
        format!("{}{}", self.key_prefix, blake3::hash(code.as_bytes()).to_hex())
    }

    async fn connection(&self) -> ApplicationResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))
    }
}

fn parse_failure(reason: &str) -> ApplicationResult<RedemptionFailure> {
    match reason {
        "unknown" => Ok(RedemptionFailure::Unknown),
        "already_consumed" => Ok(RedemptionFailure::AlreadyConsumed),
        "expired" => Ok(RedemptionFailure::Expired),
        "client_mismatch" => Ok(RedemptionFailure::ClientMismatch),
        "redirect_mismatch" => Ok(RedemptionFailure::RedirectMismatch),
        other => Err(ApplicationError::infrastructure(format!(
            "unexpected redemption reply {other}"
        ))),
    }
}

fn parse_reply(reply: &[String]) -> ApplicationResult<Redemption> {
    match reply {
        [tag, payload] if tag == "redeemed" => {
            let mut record: AuthorizationCode = serde_json::from_str(payload)
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
            record.consume();
            Ok(Redemption::Redeemed(record))
        }
        [tag, reason] if tag == "refused" => parse_failure(reason).map(Redemption::Refused),
        _ => Err(ApplicationError::infrastructure(
            "malformed redemption reply from redis",
        )),
    }
}

#[async_trait]
impl AuthorizationCodeStore for RedisAuthorizationCodeStore {
    async fn save(&self, code: AuthorizationCode) -> ApplicationResult<()> {
        let mut conn = self.connection().await?;

        let key = self.key_for(&code.code);
        let expires_at_ms = code.expires_at.timestamp_millis();
        let payload = serde_json::to_string(&code)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        let fields = [
            ("consumed", "0".to_string()),
            ("expires_at", expires_at_ms.to_string()),
            ("client_id", code.client_id.clone()),
            ("redirect_uri", code.redirect_uri.clone()),
            ("payload", payload),
        ];

        let (): () = redis::pipe()
            .atomic()
            .hset_multiple(&key, &fields)
            .ignore()
            .cmd("PEXPIREAT")
            .arg(&key)
            .arg(expires_at_ms)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(())
    }

    async fn validate_and_consume(
        &self,
        code: &str,
        client_id: &str,
        redirect_uri: &str,
        now: DateTime<Utc>,
    ) -> ApplicationResult<Redemption> {
        let mut conn = self.connection().await?;

        let reply: Vec<String> = self
            .script
            .key(self.key_for(code))
            .arg(now.timestamp_millis())
            .arg(client_id)
            .arg(redirect_uri)
            .invoke_async(&mut conn)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        parse_reply(&reply)
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> ApplicationResult<usize> {
        // Keys carry PEXPIREAT, so Redis evicts them on its own.
        Ok(0)
    }
}

pub fn into_arc(store: RedisAuthorizationCodeStore) -> std::sync::Arc<dyn AuthorizationCodeStore> {
    std::sync::Arc::new(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_parsing_maps_every_reason() {
        for (wire, expected) in [
            ("unknown", RedemptionFailure::Unknown),
            ("already_consumed", RedemptionFailure::AlreadyConsumed),
            ("expired", RedemptionFailure::Expired),
            ("client_mismatch", RedemptionFailure::ClientMismatch),
            ("redirect_mismatch", RedemptionFailure::RedirectMismatch),
        ] {
            let reply = vec!["refused".to_string(), wire.to_string()];
            assert!(matches!(parse_reply(&reply), Ok(Redemption::Refused(r)) if r == expected));
        }
        assert!(parse_reply(&["refused".to_string(), "weird".to_string()]).is_err());
        assert!(parse_reply(&[]).is_err());
    }
}
