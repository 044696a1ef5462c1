use std::sync::Arc;

use chrono::Duration;

use crate::{
    application::{
        codes::AuthorizationCodeService,
        commands::OidcCommandService,
        ports::{
            AuthorizationCodeStorePort, ClockPort, CodeGeneratorPort, IdTokenSignerPort,
            SessionResolverPort,
        },
        queries::UserInfoQueryService,
    },
    domain::{client::ClientRegistry, user::UserDirectory},
};

/// Everything the provider needs, wired once at startup.
pub struct ProviderPorts {
    pub registry: Arc<ClientRegistry>,
    pub code_store: Arc<AuthorizationCodeStorePort>,
    pub code_generator: Arc<CodeGeneratorPort>,
    pub sessions: Arc<SessionResolverPort>,
    pub directory: Arc<dyn UserDirectory>,
    pub signer: Arc<IdTokenSignerPort>,
    pub clock: Arc<ClockPort>,
}

pub struct ApplicationServices {
    pub oidc_commands: Arc<OidcCommandService>,
    pub userinfo_queries: Arc<UserInfoQueryService>,
    codes: Arc<AuthorizationCodeService>,
    registry: Arc<ClientRegistry>,
}

impl ApplicationServices {
    pub fn new(ports: ProviderPorts, code_ttl: Duration, login_url: impl Into<String>) -> Self {
        let ProviderPorts {
            registry,
            code_store,
            code_generator,
            sessions,
            directory,
            signer,
            clock,
        } = ports;

        let codes = Arc::new(AuthorizationCodeService::new(
            code_store,
            code_generator,
            Arc::clone(&clock),
            code_ttl,
        ));

        let oidc_commands = Arc::new(OidcCommandService::new(
            Arc::clone(&registry),
            Arc::clone(&codes),
            sessions,
            Arc::clone(&directory),
            Arc::clone(&signer),
            clock,
            login_url,
        ));

        let userinfo_queries = Arc::new(UserInfoQueryService::new(
            Arc::clone(&registry),
            directory,
            signer,
        ));

        Self {
            oidc_commands,
            userinfo_queries,
            codes,
            registry,
        }
    }

    pub fn codes(&self) -> Arc<AuthorizationCodeService> {
        Arc::clone(&self.codes)
    }

    pub fn registry(&self) -> Arc<ClientRegistry> {
        Arc::clone(&self.registry)
    }
}
