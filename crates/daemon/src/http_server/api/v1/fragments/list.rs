use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use common::fragment::{Fragment, FragmentError, UserFragments};

use crate::http_server::auth::Owner;
use crate::http_server::response;
use crate::ServiceState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// `1` or `true` to return full metadata instead of ids
    #[serde(default)]
    pub expand: Option<String>,
}

impl ListQuery {
    fn expand(&self) -> bool {
        matches!(self.expand.as_deref(), Some("1") | Some("true"))
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub fragments: UserFragments,
}

pub async fn handler(
    State(state): State<ServiceState>,
    owner: Owner,
    Query(query): Query<ListQuery>,
) -> Result<Response, ListError> {
    let expand = query.expand();
    let fragments = Fragment::by_user(state.store(), owner.id(), expand).await?;
    tracing::debug!(
        owner_id = owner.id(),
        expand,
        count = fragments.len(),
        "listed fragments"
    );
    Ok(response::success(StatusCode::OK, ListResponse { fragments }))
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("fragment error: {0}")]
    Fragment(#[from] FragmentError),
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        tracing::error!("LIST FRAGMENTS ERROR: {:?}", self);
        response::error(StatusCode::INTERNAL_SERVER_ERROR, "unable to list fragments")
    }
}
