// src/presentation/http/controllers/auth_oidc.rs
use crate::application::dto::{AuthorizeOutcome, AuthorizeRequest, TokenRequest, TokenResponse, UserInfoDto};
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::{BearerToken, ExternalOrigin, SessionCookie, TokenForm};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    http::{HeaderValue, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};

fn found(location: &str) -> HttpResult<Response> {
    let value = HeaderValue::try_from(location)
        .map_err(|_| HttpError::invalid_request("redirect target is not a valid header value"))?;
    Ok((StatusCode::FOUND, [(header::LOCATION, value)]).into_response())
}

#[utoipa::path(
    get,
    path = "/authorize",
    params(AuthorizeRequest),
    responses(
        (status = 302, description = "Redirect to the client with `code` and `state`, or to the login UI with `returnTo`.",
            headers(("Location" = String, description = "Redirect target"))),
        (status = 400, description = "Invalid authorization request", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "Session subject has no user record", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([]),
    tag = "OIDC"
)]
pub async fn authorize(
    Extension(state): Extension<HttpState>,
    origin: ExternalOrigin,
    SessionCookie(session): SessionCookie,
    uri: Uri,
) -> HttpResult<Response> {
    let request: AuthorizeRequest = serde_urlencoded::from_str(uri.query().unwrap_or_default())
        .map_err(|_| HttpError::invalid_request("malformed query string"))?;

    let path_and_query = uri
        .path_and_query()
        .map_or("/authorize", |pq| pq.as_str());
    let return_to = format!("{}{path_and_query}", origin.as_str());

    let outcome = state
        .services
        .oidc_commands
        .authorize(request, session.as_deref(), &return_to)
        .await
        .into_http()?;

    if let AuthorizeOutcome::LoginRequired(_) = &outcome {
        tracing::debug!("no active session; redirecting to login");
    }
    found(outcome.location())
}

#[utoipa::path(
    post,
    path = "/token",
    request_body(
        content = TokenRequest,
        content_type = "application/x-www-form-urlencoded",
        description = "Form or JSON body. Client credentials may be sent with HTTP Basic instead."
    ),
    responses(
        (status = 200, description = "ID token issued", body = TokenResponse),
        (status = 400, description = "Invalid or spent grant", body = crate::presentation::http::error::ErrorResponse),
        (status = 401, description = "Client authentication failed", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([]),
    tag = "OIDC"
)]
pub async fn token(
    Extension(state): Extension<HttpState>,
    origin: ExternalOrigin,
    TokenForm(request): TokenForm,
) -> Response {
    let result = state
        .services
        .oidc_commands
        .exchange_code(request, origin.as_str())
        .await;

    let mut response = match result {
        Ok(tokens) => Json(tokens).into_response(),
        Err(err) => HttpError::from_token_error(err).into_response(),
    };
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    response
}

async fn resolve_userinfo(state: &HttpState, token: Option<String>) -> HttpResult<Json<UserInfoDto>> {
    let info = state
        .services
        .userinfo_queries
        .userinfo(token.as_deref())
        .await
        .into_http()?;
    Ok(Json(info))
}

#[utoipa::path(
    get,
    path = "/userinfo",
    params(("access_token" = Option<String>, Query, description = "Bearer token when no Authorization header is sent")),
    responses(
        (status = 200, description = "Claims about the token subject", body = UserInfoDto),
        (status = 401, description = "Missing or invalid bearer token", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "Token subject has no user record", body = crate::presentation::http::error::ErrorResponse),
    ),
    security(("bearerAuth" = [])),
    tag = "OIDC"
)]
pub async fn userinfo(
    Extension(state): Extension<HttpState>,
    BearerToken(token): BearerToken,
) -> HttpResult<Json<UserInfoDto>> {
    resolve_userinfo(&state, token).await
}

#[utoipa::path(
    post,
    path = "/userinfo",
    responses(
        (status = 200, description = "Claims about the token subject", body = UserInfoDto),
        (status = 401, description = "Missing or invalid bearer token", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "Token subject has no user record", body = crate::presentation::http::error::ErrorResponse),
    ),
    security(("bearerAuth" = [])),
    tag = "OIDC"
)]
pub async fn userinfo_post(
    Extension(state): Extension<HttpState>,
    BearerToken(token): BearerToken,
) -> HttpResult<Json<UserInfoDto>> {
    resolve_userinfo(&state, token).await
}
