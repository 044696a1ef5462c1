// src/presentation/http/state.rs
use crate::application::services::ApplicationServices;
use std::sync::Arc;

#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
    /// Issuer origin used when the request names no host.
    pub public_url: Arc<str>,
    pub session_cookie: Arc<str>,
}

impl HttpState {
    pub fn new(
        services: Arc<ApplicationServices>,
        public_url: &str,
        session_cookie: &str,
    ) -> Self {
        Self {
            services,
            public_url: Arc::from(public_url.trim_end_matches('/')),
            session_cookie: Arc::from(session_cookie),
        }
    }
}
