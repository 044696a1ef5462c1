// src/presentation/http/extractors.rs
use crate::{
    application::{dto::TokenRequest, error::ApplicationError},
    presentation::http::state::HttpState,
};
use axum::{
    Extension,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{HeaderMap, header, request::Parts},
};
use headers::{
    Authorization, Cookie, HeaderMapExt,
    authorization::{Basic, Bearer},
};
use serde::Deserialize;

use super::error::HttpError;

async fn app_state<S: Send + Sync>(parts: &mut Parts, state: &S) -> Result<HttpState, HttpError> {
    let Extension(app_state) = Extension::<HttpState>::from_request_parts(parts, state)
        .await
        .map_err(|_| {
            HttpError::from_error(ApplicationError::infrastructure(
                "application state missing",
            ))
        })?;
    Ok(app_state)
}

/// Scheme and host this request reached us on, e.g. `https://admin.example`.
#[derive(Debug, Clone)]
pub struct ExternalOrigin(pub String);

impl ExternalOrigin {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn first_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn plausible_host(host: &str) -> bool {
    !host.contains(['/', '\\', '@', ' ', '?', '#'])
}

fn origin_from_headers(headers: &HeaderMap) -> Option<String> {
    let host = first_value(headers, "x-forwarded-host")
        .or_else(|| first_value(headers, header::HOST.as_str()))
        .filter(|host| plausible_host(host))?;
    let proto = match first_value(headers, "x-forwarded-proto") {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };
    Some(format!("{proto}://{host}"))
}

impl<S: Send + Sync> FromRequestParts<S> for ExternalOrigin {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(origin) = origin_from_headers(&parts.headers) {
            return Ok(Self(origin));
        }
        let app_state = app_state(parts, state).await?;
        Ok(Self(app_state.public_url.to_string()))
    }
}

/// Value of the external session cookie, when the user agent sent one.
#[derive(Debug, Clone)]
pub struct SessionCookie(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for SessionCookie {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = app_state(parts, state).await?;
        let token = parts
            .headers
            .typed_get::<Cookie>()
            .and_then(|cookies| cookies.get(&app_state.session_cookie).map(ToString::to_string))
            .filter(|token| !token.is_empty());
        Ok(Self(token))
    }
}

#[derive(Deserialize)]
struct AccessTokenQuery {
    access_token: Option<String>,
}

/// Bearer token from the `Authorization` header, or the `access_token`
/// query parameter as a fallback.
#[derive(Debug, Clone)]
pub struct BearerToken(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(header) = parts.headers.typed_get::<Authorization<Bearer>>() {
            return Ok(Self(Some(header.token().to_string())));
        }

        let from_query = parts
            .uri
            .query()
            .and_then(|query| serde_urlencoded::from_str::<AccessTokenQuery>(query).ok())
            .and_then(|query| query.access_token)
            .filter(|token| !token.is_empty());
        Ok(Self(from_query))
    }
}

/// Token request body, JSON or form encoded, with client credentials taken
/// from HTTP Basic auth when the body leaves them out.
#[derive(Debug, Clone)]
pub struct TokenForm(pub TokenRequest);

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| {
            let mime = mime.trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
}

/// Basic credentials are form-urlencoded before being joined with `:`.
fn form_decode(raw: &str) -> Result<String, HttpError> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| HttpError::invalid_request("malformed basic credentials"))
}

impl<S: Send + Sync> FromRequest<S> for TokenForm {
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = is_json(req.headers());
        let basic = req.headers().typed_get::<Authorization<Basic>>();

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|_| HttpError::invalid_request("unreadable request body"))?;

        let mut request: TokenRequest = if body.is_empty() {
            TokenRequest::default()
        } else if json {
            serde_json::from_slice(&body)
                .map_err(|_| HttpError::invalid_request("malformed JSON body"))?
        } else {
            serde_urlencoded::from_bytes(&body)
                .map_err(|_| HttpError::invalid_request("malformed form body"))?
        };

        if let Some(Authorization(credentials)) = basic {
            if request.client_id.is_none() {
                request.client_id = Some(form_decode(credentials.username())?);
            }
            if request.client_secret.is_none() {
                request.client_secret = Some(form_decode(credentials.password())?);
            }
        }

        Ok(Self(request))
    }
}
