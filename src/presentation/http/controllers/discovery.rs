// src/presentation/http/controllers/discovery.rs
use crate::domain::authorization_code::PkceMethod;
use crate::presentation::http::extractors::ExternalOrigin;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OpenIdConfiguration {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,

    pub response_types_supported: Vec<String>,
    pub grant_types_supported: Vec<String>,
    pub subject_types_supported: Vec<String>,
    pub id_token_signing_alg_values_supported: Vec<String>,
    pub token_endpoint_auth_methods_supported: Vec<String>,
    pub scopes_supported: Vec<String>,
    pub code_challenge_methods_supported: Vec<String>,
    pub claims_supported: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

impl OpenIdConfiguration {
    pub fn for_issuer(issuer: &str) -> Self {
        let base = issuer.trim_end_matches('/');
        Self {
            issuer: base.to_string(),
            authorization_endpoint: format!("{base}/authorize"),
            token_endpoint: format!("{base}/token"),
            userinfo_endpoint: format!("{base}/userinfo"),

            response_types_supported: strings(&["code"]),
            grant_types_supported: strings(&["authorization_code"]),
            subject_types_supported: strings(&["public"]),
            id_token_signing_alg_values_supported: strings(&["HS256"]),
            token_endpoint_auth_methods_supported: strings(&[
                "client_secret_post",
                "client_secret_basic",
            ]),
            scopes_supported: strings(&["openid", "email", "profile"]),
            code_challenge_methods_supported: strings(&[
                PkceMethod::S256.as_str(),
                PkceMethod::Plain.as_str(),
            ]),
            claims_supported: strings(&[
                "sub",
                "iss",
                "aud",
                "exp",
                "iat",
                "nonce",
                "name",
                "email",
                "email_verified",
                "preferred_username",
            ]),
        }
    }
}

#[utoipa::path(
    get,
    path = "/.well-known/openid-configuration",
    responses(
        (status = 200, description = "OpenID Connect Discovery document", body = OpenIdConfiguration),
    ),
    security([]),
    tag = "OIDC"
)]
pub async fn openid_configuration(origin: ExternalOrigin) -> Json<OpenIdConfiguration> {
    Json(OpenIdConfiguration::for_issuer(origin.as_str()))
}
