use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use base64::Engine;

use common::owner::OwnerId;

use super::response;
use crate::ServiceState;

/// The authenticated caller of a `/v1` route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub OwnerId);

impl Owner {
    pub fn id(&self) -> &str {
        self.0.as_str()
    }
}

#[axum::async_trait]
impl FromRequestParts<ServiceState> for Owner {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingCredentials)?
            .to_str()
            .map_err(|_| AuthError::MalformedCredentials)?;

        let (email, password) = parse_basic(header).ok_or(AuthError::MalformedCredentials)?;

        // password hashing is cpu bound
        let users = state.users();
        let verified = tokio::task::spawn_blocking(move || users.verify(&email, &password))
            .await
            .map_err(|_| AuthError::InvalidCredentials)?;

        match verified {
            Some(owner) => {
                tracing::debug!(owner_id = %owner, "authenticated request");
                Ok(Owner(owner))
            }
            None => Err(AuthError::InvalidCredentials),
        }
    }
}

/// Split an `Authorization: Basic <base64(user:password)>` value.
fn parse_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,
    #[error("malformed credentials")]
    MalformedCredentials,
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::warn!("AUTH ERROR: {}", self);
        let mut response = response::error(StatusCode::UNAUTHORIZED, "Unauthorized");
        response.headers_mut().insert(
            WWW_AUTHENTICATE,
            http::HeaderValue::from_static("Basic realm=\"fragments\""),
        );
        response
    }
}
