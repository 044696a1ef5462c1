//! PKCE (Proof Key for Code Exchange) verification, RFC 7636.

use crate::domain::authorization_code::{CodeChallenge, PkceMethod};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

/// `BASE64URL(SHA256(verifier))` without padding.
pub fn s256_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Check a presented verifier against the challenge stored with the code.
pub fn verify(verifier: &str, challenge: &CodeChallenge) -> bool {
    match challenge.method {
        PkceMethod::S256 => s256_challenge(verifier) == challenge.challenge,
        PkceMethod::Plain => verifier == challenge.challenge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(value: &str, method: PkceMethod) -> CodeChallenge {
        CodeChallenge {
            challenge: value.to_string(),
            method,
        }
    }

    #[test]
    fn s256_matches_rfc_vector() {
        // RFC 7636 Appendix B
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        let stored = challenge("E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM", PkceMethod::S256);
        assert!(verify(verifier, &stored));
        assert!(!verify("wrong-verifier", &stored));
    }

    #[test]
    fn s256_does_not_accept_the_challenge_itself() {
        let stored = challenge(&s256_challenge("verifier"), PkceMethod::S256);
        assert!(!verify(&stored.challenge.clone(), &stored));
    }

    #[test]
    fn plain_is_case_sensitive() {
        let stored = challenge("Verifier", PkceMethod::Plain);
        assert!(verify("Verifier", &stored));
        assert!(!verify("verifier", &stored));
    }
}
