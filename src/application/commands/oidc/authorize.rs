use super::OidcCommandService;
use crate::{
    application::{
        dto::{AuthorizeOutcome, AuthorizeRequest},
        error::{ApplicationError, ApplicationResult},
        identity::resolve_user,
    },
    domain::{
        authorization_code::{CodeBinding, CodeChallenge, PkceMethod},
        client::Client,
    },
};
use url::Url;

impl OidcCommandService {
    /// Validate an authorization request and either mint a code for the
    /// session's subject or ask the browser to log in first.
    ///
    /// `return_to` is the full external URL of this request; the login UI
    /// sends the browser back there once a session exists.
    pub async fn authorize(
        &self,
        request: AuthorizeRequest,
        session_token: Option<&str>,
        return_to: &str,
    ) -> ApplicationResult<AuthorizeOutcome> {
        let client = self.authorized_client(request.client_id.as_deref())?;
        ensure_code_response_type(request.response_type.as_deref())?;
        ensure_openid_scope(request.scope.as_deref())?;
        let (redirect_uri, mut location) =
            registered_redirect(client, request.redirect_uri.as_deref())?;
        let code_challenge = parse_code_challenge(
            request.code_challenge.as_deref(),
            request.code_challenge_method.as_deref(),
        )?;

        let Some(subject) = self.active_subject(session_token).await? else {
            return self.login_redirect(return_to).map(AuthorizeOutcome::LoginRequired);
        };

        let user = resolve_user(self.directory.as_ref(), &subject).await?;

        let binding = CodeBinding {
            nonce: request.nonce,
            code_challenge,
        };
        let code = self
            .codes
            .issue(&user.id, &client.client_id, redirect_uri, binding)
            .await?;

        {
            let mut query = location.query_pairs_mut();
            query.append_pair("code", &code);
            if let Some(state) = request.state.as_deref() {
                query.append_pair("state", state);
            }
        }

        Ok(AuthorizeOutcome::Redirect(location.into()))
    }

    fn authorized_client(&self, client_id: Option<&str>) -> ApplicationResult<&Client> {
        let client_id = client_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApplicationError::invalid_client("client_id is required"))?;
        self.registry
            .lookup(client_id)
            .ok_or_else(|| ApplicationError::invalid_client("unknown client_id"))
    }

    async fn active_subject(&self, session_token: Option<&str>) -> ApplicationResult<Option<String>> {
        let Some(token) = session_token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        Ok(self
            .sessions
            .resolve_session(token)
            .await?
            .map(|session| session.subject_id))
    }

    fn login_redirect(&self, return_to: &str) -> ApplicationResult<String> {
        let query = serde_urlencoded::to_string([("returnTo", return_to)])
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let separator = if self.login_url.contains('?') { '&' } else { '?' };
        Ok(format!("{}{separator}{query}", self.login_url))
    }
}

fn ensure_code_response_type(response_type: Option<&str>) -> ApplicationResult<()> {
    match response_type {
        Some("code") => Ok(()),
        _ => Err(ApplicationError::unsupported_response_type(
            "only response_type=code is supported",
        )),
    }
}

fn ensure_openid_scope(scope: Option<&str>) -> ApplicationResult<()> {
    let has_openid = scope
        .map(|s| s.split_whitespace().any(|item| item == "openid"))
        .unwrap_or(false);
    if has_openid {
        Ok(())
    } else {
        Err(ApplicationError::invalid_scope("scope must include openid"))
    }
}

/// The exact registered string is what gets bound to the code; the parsed
/// form is only used to build the callback location.
fn registered_redirect<'a>(
    client: &Client,
    redirect_uri: Option<&'a str>,
) -> ApplicationResult<(&'a str, Url)> {
    let redirect_uri = redirect_uri
        .filter(|uri| !uri.is_empty())
        .ok_or_else(|| ApplicationError::invalid_request("redirect_uri is required"))?;
    if !client.allows_redirect(redirect_uri) {
        return Err(ApplicationError::invalid_redirect_uri(
            "redirect_uri is not registered for this client",
        ));
    }
    let parsed = Url::parse(redirect_uri)
        .map_err(|_| ApplicationError::invalid_redirect_uri("redirect_uri is not an absolute URL"))?;
    Ok((redirect_uri, parsed))
}

fn parse_code_challenge(
    challenge: Option<&str>,
    method: Option<&str>,
) -> ApplicationResult<Option<CodeChallenge>> {
    match (challenge.filter(|c| !c.is_empty()), method) {
        (None, None) => Ok(None),
        (None, Some(_)) => Err(ApplicationError::invalid_request(
            "code_challenge_method given without code_challenge",
        )),
        (Some(challenge), method) => {
            // RFC 7636: a missing method means plain.
            let method = method.map_or(Ok(PkceMethod::Plain), str::parse)?;
            Ok(Some(CodeChallenge {
                challenge: challenge.to_string(),
                method,
            }))
        }
    }
}
