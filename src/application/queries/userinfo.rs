use crate::application::{
    dto::UserInfoDto,
    error::{ApplicationError, ApplicationResult},
    identity::resolve_user,
    ports::security::IdTokenSigner,
};
use crate::domain::{client::ClientRegistry, user::UserDirectory};
use std::sync::Arc;

pub struct UserInfoQueryService {
    registry: Arc<ClientRegistry>,
    directory: Arc<dyn UserDirectory>,
    signer: Arc<dyn IdTokenSigner>,
}

impl UserInfoQueryService {
    pub fn new(
        registry: Arc<ClientRegistry>,
        directory: Arc<dyn UserDirectory>,
        signer: Arc<dyn IdTokenSigner>,
    ) -> Self {
        Self {
            registry,
            directory,
            signer,
        }
    }

    /// Claims for the subject of a bearer token previously issued by the
    /// token endpoint.
    pub async fn userinfo(&self, bearer: Option<&str>) -> ApplicationResult<UserInfoDto> {
        let token = bearer
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApplicationError::unauthorized("missing bearer token"))?;

        let claims = self.signer.verify(token)?;
        if claims.sub.is_empty() {
            return Err(ApplicationError::invalid_token("token has no subject"));
        }
        if self.registry.lookup(&claims.aud).is_none() {
            return Err(ApplicationError::invalid_token("token audience is not a registered client"));
        }

        let user = resolve_user(self.directory.as_ref(), &claims.sub).await?;
        Ok(user.into())
    }
}
