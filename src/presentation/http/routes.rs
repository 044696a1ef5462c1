// src/presentation/http/routes.rs
use crate::presentation::http::state::HttpState;
use crate::presentation::http::{
    controllers::{auth_oidc, discovery},
    middleware::rate_limit::token_rate_limit_layer,
    openapi::{self, StatusResponse},
};
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: HttpState, allowed_origins: &[String]) -> Router {
    build_router_with_rate_limiter(state, allowed_origins, true)
}

/// Same router as [`build_router`]; `rate_limited = false` drops the token
/// endpoint limiter, which needs the peer address that in-process test
/// requests do not carry.
pub fn build_router_with_rate_limiter(
    state: HttpState,
    allowed_origins: &[String],
    rate_limited: bool,
) -> Router {
    let mut token_routes = Router::new().route("/token", post(auth_oidc::token));
    if rate_limited {
        token_routes = token_routes.route_layer(token_rate_limit_layer());
    }

    Router::new()
        .merge(openapi::docs_router())
        .route("/health", get(health))
        .route(
            "/.well-known/openid-configuration",
            get(discovery::openid_configuration),
        )
        .route("/authorize", get(auth_oidc::authorize))
        .route(
            "/userinfo",
            get(auth_oidc::userinfo).post(auth_oidc::userinfo_post),
        )
        .merge(token_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .layer(Extension(state))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check.", body = crate::presentation::http::openapi::StatusResponse)
    ),
    security([]),
    tag = "System"
)]
pub async fn health() -> axum::Json<StatusResponse> {
    axum::Json(StatusResponse {
        status: "ok".into(),
    })
}
