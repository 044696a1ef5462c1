use crate::domain::user::DirectoryUser;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserInfoDto {
    pub sub: String,
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
    pub preferred_username: String,
}

impl From<DirectoryUser> for UserInfoDto {
    fn from(user: DirectoryUser) -> Self {
        Self {
            sub: user.id.clone(),
            // Used by Nextcloud as the stable account name.
            preferred_username: user.id.clone(),
            id: user.id,
            name: user.name,
            email: user.email,
            email_verified: true,
        }
    }
}
