// src/application/ports/security.rs
use crate::application::{ApplicationResult, dto::IdTokenClaims};

pub trait IdTokenSigner: Send + Sync {
    fn sign(&self, claims: &IdTokenClaims) -> ApplicationResult<String>;
    /// Check signature and expiry, returning the embedded claims.
    fn verify(&self, token: &str) -> ApplicationResult<IdTokenClaims>;
}

pub trait CodeGenerator: Send + Sync {
    /// A fresh, unguessable authorization code.
    fn generate(&self) -> String;
}
