use super::OidcCommandService;
use crate::{
    application::{
        dto::{IdTokenClaims, TokenRequest, TokenResponse},
        error::{ApplicationError, ApplicationResult},
        identity::resolve_user,
    },
    domain::{authorization_code::AuthorizationCode, client::Client, pkce, user::DirectoryUser},
};

pub const ID_TOKEN_TTL_SECS: i64 = 3600;
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";

impl OidcCommandService {
    /// Exchange an authorization code for a signed ID token.
    ///
    /// The code is spent as soon as the store accepts it. A PKCE failure
    /// afterwards does not hand it back; the client has to start over at
    /// the authorization endpoint.
    pub async fn exchange_code(
        &self,
        request: TokenRequest,
        issuer: &str,
    ) -> ApplicationResult<TokenResponse> {
        let client = self.authenticate_client(
            request.client_id.as_deref(),
            request.client_secret.as_deref(),
        )?;

        if request.grant_type.as_deref() != Some(GRANT_AUTHORIZATION_CODE) {
            return Err(ApplicationError::unsupported_grant_type(
                "only grant_type=authorization_code is supported",
            ));
        }

        let code = required(request.code.as_deref(), "code")?;
        let redirect_uri = required(request.redirect_uri.as_deref(), "redirect_uri")?;

        let record = self
            .codes
            .validate_and_consume(code, &client.client_id, redirect_uri)
            .await?;

        verify_pkce(&record, request.code_verifier.as_deref())?;

        let user = resolve_user(self.directory.as_ref(), &record.user_id).await?;
        let claims = self.id_token_claims(issuer, &record, user);
        let token = self.signer.sign(&claims)?;

        tracing::info!(client_id = %client.client_id, sub = %claims.sub, "id token issued");

        Ok(TokenResponse {
            access_token: token.clone(),
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: ID_TOKEN_TTL_SECS,
            id_token: token,
        })
    }

    fn authenticate_client(
        &self,
        client_id: Option<&str>,
        client_secret: Option<&str>,
    ) -> ApplicationResult<&Client> {
        let client = client_id
            .and_then(|id| self.registry.lookup(id))
            .ok_or_else(|| ApplicationError::invalid_client("client authentication failed"))?;
        match client_secret {
            Some(secret) if client.secret_matches(secret) => Ok(client),
            _ => Err(ApplicationError::invalid_client("client authentication failed")),
        }
    }

    fn id_token_claims(
        &self,
        issuer: &str,
        record: &AuthorizationCode,
        user: DirectoryUser,
    ) -> IdTokenClaims {
        let iat = self.clock.now().timestamp();
        IdTokenClaims {
            iss: issuer.to_string(),
            sub: user.id.clone(),
            aud: record.client_id.clone(),
            exp: iat + ID_TOKEN_TTL_SECS,
            iat,
            nonce: record.nonce.clone(),
            name: user.name,
            email: user.email,
            email_verified: true,
            preferred_username: user.id,
        }
    }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> ApplicationResult<&'a str> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApplicationError::invalid_request(format!("{name} is required")))
}

fn verify_pkce(record: &AuthorizationCode, verifier: Option<&str>) -> ApplicationResult<()> {
    let Some(challenge) = record.code_challenge.as_ref() else {
        return Ok(());
    };
    let verifier = verifier
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApplicationError::invalid_request("code_verifier is required"))?;
    if pkce::verify(verifier, challenge) {
        Ok(())
    } else {
        tracing::debug!(client_id = %record.client_id, method = %challenge.method, "pkce verification failed");
        Err(ApplicationError::InvalidGrant)
    }
}
