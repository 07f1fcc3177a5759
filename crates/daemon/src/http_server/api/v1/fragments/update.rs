use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::Serialize;

use common::fragment::{Fragment, FragmentError};

use crate::http_server::auth::Owner;
use crate::http_server::response;
use crate::ServiceState;

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub fragment: Fragment,
}

/// Replace a fragment's payload. The media type can't change.
pub async fn handler(
    State(state): State<ServiceState>,
    owner: Owner,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, UpdateError> {
    let store = state.store();
    let mut fragment = Fragment::by_id(store, owner.id(), &id)
        .await?
        .ok_or(UpdateError::NotFound(id))?;

    let declared = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    fragment.replace_data(store, declared, body).await?;

    tracing::info!(
        owner_id = owner.id(),
        id = fragment.id(),
        size = fragment.size(),
        "fragment updated"
    );
    Ok(response::success(StatusCode::OK, UpdateResponse { fragment }))
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("fragment not found: {0}")]
    NotFound(String),
    #[error("fragment error: {0}")]
    Fragment(#[from] FragmentError),
}

impl IntoResponse for UpdateError {
    fn into_response(self) -> Response {
        match self {
            UpdateError::NotFound(_) => {
                response::error(StatusCode::NOT_FOUND, "fragment not found")
            }
            UpdateError::Fragment(e @ FragmentError::TypeMismatch { .. }) => {
                tracing::warn!("UPDATE FRAGMENT ERROR: {}", e);
                response::error(StatusCode::BAD_REQUEST, e.to_string())
            }
            UpdateError::Fragment(e) => {
                tracing::error!("UPDATE FRAGMENT ERROR: {:?}", e);
                response::error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "unable to update fragment",
                )
            }
        }
    }
}
