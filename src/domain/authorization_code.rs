// src/domain/authorization_code.rs
use crate::domain::errors::DomainError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PkceMethod {
    S256,
    #[serde(rename = "plain")]
    Plain,
}

impl PkceMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PkceMethod::S256 => "S256",
            PkceMethod::Plain => "plain",
        }
    }
}

impl fmt::Display for PkceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PkceMethod {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "S256" => Ok(PkceMethod::S256),
            "plain" => Ok(PkceMethod::Plain),
            other => Err(DomainError::Validation(format!(
                "unsupported code_challenge_method {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeChallenge {
    pub challenge: String,
    pub method: PkceMethod,
}

/// Optional parameters bound to a code at issuance.
#[derive(Debug, Clone, Default)]
pub struct CodeBinding {
    pub nonce: Option<String>,
    pub code_challenge: Option<CodeChallenge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationCode {
    pub code: String,
    pub user_id: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub nonce: Option<String>,
    pub code_challenge: Option<CodeChallenge>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
}

/// Why a redemption was refused. Only ever logged; callers outside the
/// provider see a single `invalid_grant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionFailure {
    Unknown,
    AlreadyConsumed,
    Expired,
    ClientMismatch,
    RedirectMismatch,
}

impl RedemptionFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedemptionFailure::Unknown => "unknown",
            RedemptionFailure::AlreadyConsumed => "already_consumed",
            RedemptionFailure::Expired => "expired",
            RedemptionFailure::ClientMismatch => "client_mismatch",
            RedemptionFailure::RedirectMismatch => "redirect_mismatch",
        }
    }
}

impl AuthorizationCode {
    pub fn new(
        code: String,
        user_id: impl Into<String>,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
        binding: CodeBinding,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            code,
            user_id: user_id.into(),
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            nonce: binding.nonce,
            code_challenge: binding.code_challenge,
            created_at: issued_at,
            expires_at: issued_at + ttl,
            consumed: false,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Ordered redemption checks: consumed, expired, client, redirect.
    /// A mismatch leaves the code untouched.
    pub fn check_redeemable(
        &self,
        client_id: &str,
        redirect_uri: &str,
        now: DateTime<Utc>,
    ) -> Result<(), RedemptionFailure> {
        if self.consumed {
            return Err(RedemptionFailure::AlreadyConsumed);
        }
        if self.is_expired(now) {
            return Err(RedemptionFailure::Expired);
        }
        if self.client_id != client_id {
            return Err(RedemptionFailure::ClientMismatch);
        }
        if self.redirect_uri != redirect_uri {
            return Err(RedemptionFailure::RedirectMismatch);
        }
        Ok(())
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issued_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sample() -> AuthorizationCode {
        AuthorizationCode::new(
            "abc".into(),
            "u1",
            "nextcloud",
            "https://cloud.example/cb",
            CodeBinding::default(),
            issued_at(),
            Duration::minutes(10),
        )
    }

    #[test]
    fn redeemable_within_ttl_for_matching_binding() {
        let code = sample();
        let now = issued_at() + Duration::minutes(9);
        assert_eq!(
            code.check_redeemable("nextcloud", "https://cloud.example/cb", now),
            Ok(())
        );
    }

    #[test]
    fn checks_run_in_order() {
        let mut code = sample();
        let late = issued_at() + Duration::minutes(10);
        assert_eq!(
            code.check_redeemable("other", "https://evil/cb", late),
            Err(RedemptionFailure::Expired)
        );
        assert_eq!(
            code.check_redeemable("other", "https://evil/cb", issued_at()),
            Err(RedemptionFailure::ClientMismatch)
        );
        assert_eq!(
            code.check_redeemable("nextcloud", "https://evil/cb", issued_at()),
            Err(RedemptionFailure::RedirectMismatch)
        );
        code.consume();
        assert_eq!(
            code.check_redeemable("other", "https://evil/cb", late),
            Err(RedemptionFailure::AlreadyConsumed)
        );
    }

    #[test]
    fn stored_record_carries_only_the_binding_it_redeems_with() {
        let value = serde_json::to_value(sample()).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            [
                "client_id",
                "code",
                "code_challenge",
                "consumed",
                "created_at",
                "expires_at",
                "nonce",
                "redirect_uri",
                "user_id",
            ]
        );
    }

    #[test]
    fn pkce_method_parses_wire_names_only() {
        assert_eq!("S256".parse::<PkceMethod>().unwrap(), PkceMethod::S256);
        assert_eq!("plain".parse::<PkceMethod>().unwrap(), PkceMethod::Plain);
        assert!("s256".parse::<PkceMethod>().is_err());
        assert!("RS256".parse::<PkceMethod>().is_err());
    }
}
