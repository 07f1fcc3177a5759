use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use common::fragment::{Fragment, FragmentError};

use crate::http_server::auth::Owner;
use crate::http_server::response;
use crate::ServiceState;

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub fragment: Fragment,
    /// Media types the fragment can be converted to
    pub formats: Vec<String>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    owner: Owner,
    Path(id): Path<String>,
) -> Result<Response, InfoError> {
    let fragment = Fragment::by_id(state.store(), owner.id(), &id)
        .await?
        .ok_or(InfoError::NotFound(id))?;
    let formats = fragment.formats();
    Ok(response::success(
        StatusCode::OK,
        InfoResponse { fragment, formats },
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum InfoError {
    #[error("fragment not found: {0}")]
    NotFound(String),
    #[error("fragment error: {0}")]
    Fragment(#[from] FragmentError),
}

impl IntoResponse for InfoError {
    fn into_response(self) -> Response {
        match self {
            InfoError::NotFound(_) => response::error(StatusCode::NOT_FOUND, "fragment not found"),
            InfoError::Fragment(e) => {
                tracing::error!("FRAGMENT INFO ERROR: {:?}", e);
                response::error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "unable to get fragment info",
                )
            }
        }
    }
}
