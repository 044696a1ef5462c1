// tests/support/helpers.rs
use super::mocks;
use axum::Router;
use axum::body::{self, Body};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use axum::response::Response;
use platform_oidc::application::ports::time::Clock;
use platform_oidc::application::services::{ApplicationServices, ProviderPorts};
use platform_oidc::domain::client::{Client, ClientRegistry};
use platform_oidc::infrastructure::security::{
    authorization_code_store::{self, InMemoryAuthorizationCodeStore},
    random::OsRandomCodeGenerator,
    session_resolver::{self, InMemorySessionResolver},
    token::HsIdTokenSigner,
};
use platform_oidc::presentation::http::{routes::build_router_with_rate_limiter, state::HttpState};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt as _;
use url::Url;

pub const CLIENT_ID: &str = "nextcloud";
pub const CLIENT_SECRET: &str = "nextcloud-client-secret";
pub const REDIRECT_URI: &str = "https://cloud.example/apps/sociallogin/custom_oidc/platform";
pub const OTHER_CLIENT_ID: &str = "wiki";
pub const OTHER_CLIENT_SECRET: &str = "wiki:secret+50% off";
pub const OTHER_REDIRECT_URI: &str = "https://wiki.example/oidc/callback";
pub const SIGNING_SECRET: &[u8] = b"test-signing-secret-test-signing-secret";
pub const PUBLIC_URL: &str = "http://provider.test";
pub const LOGIN_URL: &str = "/login";
pub const SESSION_COOKIE: &str = "session";

/// Session cookie values known to the in-memory resolver.
pub const SESSION_TOKEN: &str = "sess-ada";
pub const EXTERNAL_SESSION_TOKEN: &str = "sess-ada-external";
pub const GHOST_SESSION_TOKEN: &str = "sess-ghost";
pub const BROKEN_SESSION_TOKEN: &str = "sess-broken";

pub fn test_registry() -> ClientRegistry {
    ClientRegistry::new([
        Client::new(CLIENT_ID, CLIENT_SECRET, [REDIRECT_URI]),
        Client::new(OTHER_CLIENT_ID, OTHER_CLIENT_SECRET, [OTHER_REDIRECT_URI]),
    ])
    .expect("valid test registry")
}

pub fn build_test_state_with_clock(clock: Arc<dyn Clock>) -> HttpState {
    let sessions = InMemorySessionResolver::new();
    sessions.insert(SESSION_TOKEN, mocks::USER_ID);
    sessions.insert(EXTERNAL_SESSION_TOKEN, mocks::USER_EXTERNAL_ID);
    sessions.insert(GHOST_SESSION_TOKEN, mocks::GHOST_SUBJECT);
    sessions.insert(BROKEN_SESSION_TOKEN, mocks::BROKEN_SUBJECT);

    let services = Arc::new(ApplicationServices::new(
        ProviderPorts {
            registry: Arc::new(test_registry()),
            code_store: authorization_code_store::into_arc(InMemoryAuthorizationCodeStore::new()),
            code_generator: Arc::new(OsRandomCodeGenerator),
            sessions: session_resolver::into_arc(sessions),
            directory: Arc::new(mocks::StaticUserDirectory),
            signer: Arc::new(HsIdTokenSigner::new(SIGNING_SECRET)),
            clock,
        },
        chrono::Duration::seconds(600),
        LOGIN_URL,
    ));

    HttpState::new(services, PUBLIC_URL, SESSION_COOKIE)
}

pub fn build_test_state() -> HttpState {
    build_test_state_with_clock(Arc::new(mocks::RealClock))
}

pub fn make_test_router() -> Router {
    build_router_with_rate_limiter(build_test_state(), &[], false)
}

pub fn make_test_router_with_clock(clock: Arc<dyn Clock>) -> Router {
    build_router_with_rate_limiter(build_test_state_with_clock(clock), &[], false)
}

/// `/authorize` query for the default client, overridable per parameter.
/// A `None` value drops the parameter.
pub fn authorize_uri(overrides: &[(&str, Option<&str>)]) -> String {
    let mut params: Vec<(&str, &str)> = vec![
        ("client_id", CLIENT_ID),
        ("redirect_uri", REDIRECT_URI),
        ("response_type", "code"),
        ("scope", "openid email profile"),
        ("state", "xyz"),
    ];
    for (name, value) in overrides {
        params.retain(|(key, _)| key != name);
        if let Some(value) = value {
            params.push((*name, *value));
        }
    }
    format!(
        "/authorize?{}",
        serde_urlencoded::to_string(&params).expect("encode authorize query")
    )
}

pub fn get_with_session(uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(session) = session {
        builder = builder.header(header::COOKIE, format!("theme=dark; {SESSION_COOKIE}={session}"));
    }
    builder.body(Body::empty()).expect("request")
}

pub fn token_form_request(pairs: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            serde_urlencoded::to_string(pairs).expect("encode token form"),
        ))
        .expect("request")
}

/// Form body for redeeming `code` as the default client.
pub fn token_exchange_request(code: &str, verifier: Option<&str>) -> Request<Body> {
    let mut pairs = vec![
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", REDIRECT_URI),
        ("client_id", CLIENT_ID),
        ("client_secret", CLIENT_SECRET),
    ];
    if let Some(verifier) = verifier {
        pairs.push(("code_verifier", verifier));
    }
    token_form_request(&pairs)
}

pub fn location(resp: &Response) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}

/// Query parameter from an absolute or path-only URL.
pub fn query_param(location: &str, name: &str) -> Option<String> {
    let url = Url::parse(location)
        .or_else(|_| Url::parse(PUBLIC_URL).and_then(|base| base.join(location)))
        .expect("parsable location");
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Run `/authorize` for the signed-in test user and return the issued code.
pub async fn issue_code(app: &Router, overrides: &[(&str, Option<&str>)]) -> String {
    let resp = app
        .clone()
        .oneshot(get_with_session(&authorize_uri(overrides), Some(SESSION_TOKEN)))
        .await
        .expect("authorize response");
    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = location(&resp);
    let expected = overrides
        .iter()
        .find(|(name, _)| *name == "redirect_uri")
        .and_then(|(_, value)| *value)
        .unwrap_or(REDIRECT_URI);
    assert!(location.starts_with(expected), "unexpected redirect {location}");
    query_param(&location, "code").expect("code in redirect")
}

pub async fn response_json(resp: Response) -> (StatusCode, HeaderMap, Value) {
    let (parts, body_stream) = resp.into_parts();
    let body_bytes = body::to_bytes(body_stream, 1024 * 1024)
        .await
        .expect("read body");
    let json: Value = serde_json::from_slice(&body_bytes).expect("json body");
    (parts.status, parts.headers, json)
}

/// Assert that a response is an OAuth2 error body with the expected status
/// and `error` code.
pub async fn assert_error_response(resp: Response, expected_status: StatusCode, expected_error: &str) {
    assert_eq!(resp.status(), expected_status);
    let ct = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(ct.starts_with("application/json"), "unexpected content-type: {ct}");
    let (_, _, json) = response_json(resp).await;
    let err_field = json.get("error").and_then(Value::as_str).unwrap_or("");
    assert_eq!(err_field, expected_error, "unexpected error body: {json}");
}
