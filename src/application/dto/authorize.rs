use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters of the authorization endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorizeRequest {
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub response_type: Option<String>,
    pub scope: Option<String>,
    pub state: Option<String>,
    pub nonce: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizeOutcome {
    /// Back to the relying party with `code` (and `state`).
    Redirect(String),
    /// No session: send the browser to the login UI, resuming afterwards.
    LoginRequired(String),
}

impl AuthorizeOutcome {
    pub fn location(&self) -> &str {
        match self {
            AuthorizeOutcome::Redirect(url) | AuthorizeOutcome::LoginRequired(url) => url,
        }
    }
}
