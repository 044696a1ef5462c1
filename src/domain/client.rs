// src/domain/client.rs
use crate::domain::errors::{DomainError, DomainResult};
use hmac::digest::CtOutput;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// A relying party allowed to run the authorization code flow against us.
#[derive(Clone, Deserialize)]
pub struct Client {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uris: BTreeSet<String>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uris", &self.redirect_uris)
            .finish()
    }
}

impl Client {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uris: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uris: redirect_uris.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact string match against the registered callback URLs.
    pub fn allows_redirect(&self, redirect_uri: &str) -> bool {
        self.redirect_uris.contains(redirect_uri)
    }

    /// Byte-for-byte secret comparison. Both sides are hashed first so the
    /// comparison runs over equal-length digests in constant time.
    pub fn secret_matches(&self, presented: &str) -> bool {
        let expected = CtOutput::<Sha256>::new(Sha256::digest(self.client_secret.as_bytes()));
        let presented = CtOutput::<Sha256>::new(Sha256::digest(presented.as_bytes()));
        expected == presented
    }

    fn validate(&self) -> DomainResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(DomainError::Validation("client_id must not be empty".into()));
        }
        if self.client_secret.is_empty() {
            return Err(DomainError::Validation(format!(
                "client {} has an empty secret",
                self.client_id
            )));
        }
        if self.redirect_uris.is_empty() {
            return Err(DomainError::Validation(format!(
                "client {} has no redirect uris",
                self.client_id
            )));
        }
        Ok(())
    }
}

/// Static client configuration, built once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct ClientRegistry {
    clients: HashMap<String, Client>,
}

impl ClientRegistry {
    pub fn new(clients: impl IntoIterator<Item = Client>) -> DomainResult<Self> {
        let mut map = HashMap::new();
        for client in clients {
            client.validate()?;
            if map.contains_key(&client.client_id) {
                return Err(DomainError::Validation(format!(
                    "duplicate client_id {}",
                    client.client_id
                )));
            }
            map.insert(client.client_id.clone(), client);
        }
        Ok(Self { clients: map })
    }

    pub fn lookup(&self, client_id: &str) -> Option<&Client> {
        self.clients.get(client_id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
