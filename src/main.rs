use anyhow::Result;
use platform_oidc::application::{
    ports::{
        authorization_code::AuthorizationCodeStore,
        security::{CodeGenerator, IdTokenSigner},
        session::SessionResolver,
        time::Clock,
    },
    services::{ApplicationServices, ProviderPorts},
};
use platform_oidc::config::AppConfig;
use platform_oidc::domain::{client::ClientRegistry, user::UserDirectory};
use platform_oidc::infrastructure::{
    database, jobs,
    repositories::PostgresUserDirectory,
    security::{
        random::OsRandomCodeGenerator,
        redis_authorization_code_store::{self, RedisAuthorizationCodeStore},
        session_resolver::{self, RedisSessionResolver},
        token::HsIdTokenSigner,
    },
    time::SystemClock,
};
use platform_oidc::presentation::http::{routes::build_router, state::HttpState};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let registry = Arc::new(ClientRegistry::new(config.clients().iter().cloned())?);
    tracing::info!(clients = registry.len(), "client registry loaded");

    let pool = database::init_pool(config.database_url()).await?;
    let directory: Arc<dyn UserDirectory> = Arc::new(PostgresUserDirectory::new(
        pool,
        config.user_external_id_column(),
    )?);

    let code_store: Arc<dyn AuthorizationCodeStore> = redis_authorization_code_store::into_arc(
        RedisAuthorizationCodeStore::from_url(config.redis_url())?,
    );
    let sessions: Arc<dyn SessionResolver> = session_resolver::into_arc(
        RedisSessionResolver::from_url(config.redis_url(), config.session_key_prefix())?,
    );

    let signer: Arc<dyn IdTokenSigner> = Arc::new(HsIdTokenSigner::new(config.signing_secret()));
    let code_generator: Arc<dyn CodeGenerator> = Arc::new(OsRandomCodeGenerator);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let code_ttl = chrono::Duration::from_std(config.code_ttl())?;
    let services = Arc::new(ApplicationServices::new(
        ProviderPorts {
            registry,
            code_store,
            code_generator,
            sessions,
            directory,
            signer,
            clock,
        },
        code_ttl,
        config.login_url(),
    ));

    if let Some(every) = config.code_sweep_interval() {
        jobs::spawn_code_sweeper(services.codes(), every);
    }

    let state = HttpState::new(
        Arc::clone(&services),
        config.public_url(),
        config.session_cookie_name(),
    );

    let app = build_router(state, config.allowed_origins());
    let service = app.into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
