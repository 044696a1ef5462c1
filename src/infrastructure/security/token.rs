// src/infrastructure/security/token.rs
use crate::application::{
    dto::IdTokenClaims,
    error::{ApplicationError, ApplicationResult},
    ports::security::IdTokenSigner,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// HS256 signer shared by the token and userinfo endpoints.
#[derive(Clone)]
pub struct HsIdTokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl HsIdTokenSigner {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Audience is checked against the client registry by the caller and
        // the issuer follows the request origin, so neither is pinned here.
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl IdTokenSigner for HsIdTokenSigner {
    fn sign(&self, claims: &IdTokenClaims) -> ApplicationResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(|err| {
            tracing::error!(error = %err, "failed to sign id token");
            ApplicationError::infrastructure("failed to sign id token")
        })
    }

    fn verify(&self, token: &str) -> ApplicationResult<IdTokenClaims> {
        decode::<IdTokenClaims>(token, &self.decoding, &Self::validation())
            .map(|data| data.claims)
            .map_err(|err| ApplicationError::invalid_token(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn claims(exp_offset: i64) -> IdTokenClaims {
        let now = Utc::now().timestamp();
        IdTokenClaims {
            iss: "https://admin.example".into(),
            sub: "u1".into(),
            aud: "nextcloud".into(),
            exp: now + exp_offset,
            iat: now,
            nonce: Some("n-0S6_WzA2Mj".into()),
            name: Some("Ada".into()),
            email: Some("ada@example.org".into()),
            email_verified: true,
            preferred_username: "u1".into(),
        }
    }

    #[test]
    fn signed_token_verifies_with_same_secret() {
        let signer = HsIdTokenSigner::new(SECRET);
        let original = claims(3600);
        let token = signer.sign(&original).expect("should sign");
        assert_eq!(signer.verify(&token).expect("should verify"), original);
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = HsIdTokenSigner::new(SECRET).sign(&claims(3600)).unwrap();
        let other = HsIdTokenSigner::new(b"another-secret-another-secret-xx");
        assert!(matches!(other.verify(&token), Err(ApplicationError::InvalidToken(_))));
    }

    #[test]
    fn expired_and_tampered_tokens_are_rejected() {
        let signer = HsIdTokenSigner::new(SECRET);
        let expired = signer.sign(&claims(-3600)).unwrap();
        assert!(matches!(signer.verify(&expired), Err(ApplicationError::InvalidToken(_))));

        let token = signer.sign(&claims(3600)).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(matches!(signer.verify(&tampered), Err(ApplicationError::InvalidToken(_))));
        assert!(matches!(signer.verify("not-a-jwt"), Err(ApplicationError::InvalidToken(_))));
    }

    #[test]
    fn recently_expired_token_gets_no_grace_period() {
        let signer = HsIdTokenSigner::new(SECRET);
        let just_expired = signer.sign(&claims(-30)).unwrap();
        assert!(matches!(
            signer.verify(&just_expired),
            Err(ApplicationError::InvalidToken(_))
        ));
    }
}
