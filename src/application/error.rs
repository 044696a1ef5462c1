// src/application/error.rs
use crate::domain::errors::DomainError;
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("invalid_request: {0}")]
    InvalidRequest(String),

    #[error("invalid_client: {0}")]
    InvalidClient(String),

    #[error("invalid_redirect_uri: {0}")]
    InvalidRedirectUri(String),

    #[error("unsupported_response_type: {0}")]
    UnsupportedResponseType(String),

    #[error("invalid_scope: {0}")]
    InvalidScope(String),

    #[error("unsupported_grant_type: {0}")]
    UnsupportedGrantType(String),

    /// Never carries a reason: unknown, expired, consumed and mismatched
    /// codes must look the same from outside.
    #[error("invalid_grant")]
    InvalidGrant,

    #[error("invalid_token: {0}")]
    InvalidToken(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("user_not_found: {0}")]
    UserNotFound(String),

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn invalid_client(msg: impl Into<String>) -> Self {
        Self::InvalidClient(msg.into())
    }

    pub fn invalid_redirect_uri(msg: impl Into<String>) -> Self {
        Self::InvalidRedirectUri(msg.into())
    }

    pub fn unsupported_response_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedResponseType(msg.into())
    }

    pub fn invalid_scope(msg: impl Into<String>) -> Self {
        Self::InvalidScope(msg.into())
    }

    pub fn unsupported_grant_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedGrantType(msg.into())
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn user_not_found(msg: impl Into<String>) -> Self {
        Self::UserNotFound(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    /// OAuth2 / OIDC error code as sent on the wire.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidClient(_) => "invalid_client",
            Self::InvalidRedirectUri(_) => "invalid_redirect_uri",
            Self::UnsupportedResponseType(_) => "unsupported_response_type",
            Self::InvalidScope(_) => "invalid_scope",
            Self::UnsupportedGrantType(_) => "unsupported_grant_type",
            Self::InvalidGrant => "invalid_grant",
            Self::InvalidToken(_) => "invalid_token",
            Self::Unauthorized(_) => "unauthorized",
            Self::UserNotFound(_) => "user_not_found",
            Self::Infrastructure(_) => "server_error",
        }
    }

    /// Detail that is safe to hand back to the caller, if any.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::InvalidRequest(msg)
            | Self::InvalidClient(msg)
            | Self::InvalidRedirectUri(msg)
            | Self::UnsupportedResponseType(msg)
            | Self::InvalidScope(msg)
            | Self::UnsupportedGrantType(msg)
            | Self::InvalidToken(msg)
            | Self::Unauthorized(msg)
            | Self::UserNotFound(msg) => Some(msg.as_str()),
            Self::InvalidGrant | Self::Infrastructure(_) => None,
        }
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::InvalidRequest(msg),
            DomainError::Persistence(msg) => Self::Infrastructure(msg),
        }
    }
}
