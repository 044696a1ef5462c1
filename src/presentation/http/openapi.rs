use axum::Router;
use serde::{Deserialize, Serialize};
use std::{env, fs::File, io::BufWriter, path::Path};
use utoipa::openapi::{
    Components,
    security::{Http, HttpAuthScheme, SecurityScheme},
    server::Server,
};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::discovery::openid_configuration,
        crate::presentation::http::controllers::auth_oidc::authorize,
        crate::presentation::http::controllers::auth_oidc::token,
        crate::presentation::http::controllers::auth_oidc::userinfo,
        crate::presentation::http::controllers::auth_oidc::userinfo_post,
        super::routes::health
    ),
    components(
        schemas(
            StatusResponse,
            crate::presentation::http::error::ErrorResponse,
            crate::presentation::http::controllers::discovery::OpenIdConfiguration,
            crate::application::dto::TokenRequest,
            crate::application::dto::TokenResponse,
            crate::application::dto::UserInfoDto
        )
    ),
    tags(
        (name = "OIDC", description = "OpenID Connect provider endpoints"),
        (name = "System", description = "System level endpoints")
    ),
    modifiers(&ApiDocCustomizer),
    info(
        title = "Platform OIDC Provider",
        description = "Authorization code flow with PKCE for relying parties such as Nextcloud",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct ApiDocCustomizer;

impl Modify for ApiDocCustomizer {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::default);
        let mut http = Http::new(HttpAuthScheme::Bearer);
        http.bearer_format = Some("JWT".into());
        components.add_security_scheme("bearerAuth", SecurityScheme::Http(http));

        let servers = openapi.servers.get_or_insert_with(Vec::new);
        servers.clear();
        if let Ok(url) = env::var("PUBLIC_URL") {
            let sanitized = url.trim().trim_end_matches('/');
            if !sanitized.is_empty() {
                servers.push(Server::new(sanitized));
            }
        }
    }
}

pub fn docs_router() -> Router {
    let openapi = ApiDoc::openapi();
    let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi.clone());
    let redoc = Redoc::with_url("/redoc", openapi);
    Router::new().merge(swagger).merge(redoc)
}

pub fn write_openapi_snapshot() -> std::io::Result<()> {
    let spec = ApiDoc::openapi();
    let output_path =
        env::var("OPENAPI_SNAPSHOT_PATH").unwrap_or_else(|_| "spec/openapi.json".to_string());
    let path = Path::new(&output_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &spec)?;
    Ok(())
}
