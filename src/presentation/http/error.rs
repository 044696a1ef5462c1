use crate::application::{ApplicationResult, error::ApplicationError};
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    code: &'static str,
    description: Option<String>,
    challenge: Option<&'static str>,
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        let status = match &err {
            ApplicationError::InvalidRequest(_)
            | ApplicationError::InvalidClient(_)
            | ApplicationError::InvalidRedirectUri(_)
            | ApplicationError::UnsupportedResponseType(_)
            | ApplicationError::InvalidScope(_)
            | ApplicationError::UnsupportedGrantType(_)
            | ApplicationError::InvalidGrant => StatusCode::BAD_REQUEST,
            ApplicationError::InvalidToken(_) | ApplicationError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            ApplicationError::UserNotFound(_) => StatusCode::NOT_FOUND,
            ApplicationError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "request failed on infrastructure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let challenge = match &err {
            ApplicationError::InvalidToken(_) => Some(r#"Bearer error="invalid_token""#),
            ApplicationError::Unauthorized(_) => Some("Bearer"),
            _ => None,
        };

        Self {
            status,
            code: err.error_code(),
            description: err.description().map(ToString::to_string),
            challenge,
        }
    }

    /// Token endpoint flavour: a failed client authentication is a 401 there.
    pub fn from_token_error(err: ApplicationError) -> Self {
        let mut mapped = Self::from_error(err);
        if mapped.code == "invalid_client" {
            mapped.status = StatusCode::UNAUTHORIZED;
            mapped.challenge = Some(r#"Basic realm="token""#);
        }
        mapped
    }

    pub fn invalid_request(description: impl Into<String>) -> Self {
        Self::from_error(ApplicationError::invalid_request(description))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let payload = ErrorResponse {
            error: self.code.to_string(),
            error_description: self.description,
        };
        let mut response = (self.status, Json(payload)).into_response();
        if let Some(challenge) = self.challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
        }
        response
    }
}

/// OAuth2 style error body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_and_client_errors_map_to_oauth_statuses() {
        assert_eq!(
            HttpError::from_error(ApplicationError::InvalidGrant).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HttpError::from_error(ApplicationError::invalid_client("x")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HttpError::from_token_error(ApplicationError::invalid_client("x")).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            HttpError::from_error(ApplicationError::user_not_found("x")).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn infrastructure_detail_is_not_exposed() {
        let err = HttpError::from_error(ApplicationError::infrastructure("redis down"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "server_error");
        assert!(err.description.is_none());
    }
}
