use std::sync::Arc;

use crate::application::{
    codes::AuthorizationCodeService,
    ports::{security::IdTokenSigner, session::SessionResolver, time::Clock},
};
use crate::domain::{client::ClientRegistry, user::UserDirectory};

pub struct OidcCommandService {
    pub(super) registry: Arc<ClientRegistry>,
    pub(super) codes: Arc<AuthorizationCodeService>,
    pub(super) sessions: Arc<dyn SessionResolver>,
    pub(super) directory: Arc<dyn UserDirectory>,
    pub(super) signer: Arc<dyn IdTokenSigner>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) login_url: String,
}

impl OidcCommandService {
    pub fn new(
        registry: Arc<ClientRegistry>,
        codes: Arc<AuthorizationCodeService>,
        sessions: Arc<dyn SessionResolver>,
        directory: Arc<dyn UserDirectory>,
        signer: Arc<dyn IdTokenSigner>,
        clock: Arc<dyn Clock>,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            codes,
            sessions,
            directory,
            signer,
            clock,
            login_url: login_url.into(),
        }
    }
}
