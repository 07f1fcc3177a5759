use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use common::fragment::{Fragment, FragmentError};

use crate::http_server::auth::Owner;
use crate::http_server::response;
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    owner: Owner,
    Path(id): Path<String>,
) -> Result<Response, DeleteError> {
    let store = state.store();
    let fragment = Fragment::by_id(store, owner.id(), &id)
        .await?
        .ok_or(DeleteError::NotFound(id))?;
    fragment.delete(store).await?;

    tracing::info!(owner_id = owner.id(), id = fragment.id(), "fragment deleted");
    Ok(response::success(StatusCode::OK, serde_json::json!({})))
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("fragment not found: {0}")]
    NotFound(String),
    #[error("fragment error: {0}")]
    Fragment(#[from] FragmentError),
}

impl IntoResponse for DeleteError {
    fn into_response(self) -> Response {
        match self {
            DeleteError::NotFound(_) => {
                response::error(StatusCode::NOT_FOUND, "fragment not found")
            }
            DeleteError::Fragment(e) => {
                tracing::error!("DELETE FRAGMENT ERROR: {:?}", e);
                response::error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "unable to delete fragment",
                )
            }
        }
    }
}
