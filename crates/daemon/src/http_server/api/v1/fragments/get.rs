use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use common::convert::{convert, valid_extensions, ConvertError};
use common::fragment::{Fragment, FragmentError};

use crate::http_server::auth::Owner;
use crate::http_server::response;
use crate::ServiceState;

/// Split `abc.html` into the fragment id and requested extension.
fn split_extension(raw: &str) -> (&str, Option<&str>) {
    match raw.rsplit_once('.') {
        Some((id, ext)) if !id.is_empty() && !ext.is_empty() => (id, Some(ext)),
        _ => (raw, None),
    }
}

/// Serve a fragment's payload, converted when the path carries an extension.
pub async fn handler(
    State(state): State<ServiceState>,
    owner: Owner,
    Path(raw_id): Path<String>,
) -> Result<Response, GetError> {
    let (id, extension) = split_extension(&raw_id);
    let store = state.store();

    let fragment = Fragment::by_id(store, owner.id(), id)
        .await?
        .ok_or_else(|| GetError::NotFound(id.to_string()))?;
    let data = fragment.data(store).await?.unwrap_or_default();

    let Some(extension) = extension else {
        return Ok((
            StatusCode::OK,
            [(CONTENT_TYPE, fragment.fragment_type().to_string())],
            data,
        )
            .into_response());
    };

    // image re-encoding is CPU bound
    let source = fragment.fragment_type().to_string();
    let target = extension.to_string();
    let converted = tokio::task::spawn_blocking(move || convert(data, &source, &target))
        .await
        .map_err(|e| GetError::Join(e.to_string()))??;

    tracing::debug!(
        owner_id = owner.id(),
        id,
        extension,
        content_type = %converted.content_type,
        "converted fragment"
    );

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, converted.content_type)],
        converted.data,
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum GetError {
    #[error("fragment not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("conversion task failed: {0}")]
    Join(String),
    #[error("fragment error: {0}")]
    Fragment(#[from] FragmentError),
}

impl IntoResponse for GetError {
    fn into_response(self) -> Response {
        match self {
            GetError::NotFound(_) => response::error(StatusCode::NOT_FOUND, "fragment not found"),
            GetError::Convert(ConvertError::UnsupportedConversion { ref from, .. }) => {
                tracing::warn!("GET FRAGMENT ERROR: {}", self);
                let allowed = valid_extensions(from);
                let message = if allowed.is_empty() {
                    self.to_string()
                } else {
                    format!("{} (supported: .{})", self, allowed.join(", ."))
                };
                response::error(StatusCode::UNSUPPORTED_MEDIA_TYPE, message)
            }
            GetError::Convert(ConvertError::Malformed { .. }) => {
                tracing::warn!("GET FRAGMENT ERROR: {}", self);
                response::error(StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            GetError::Join(_) | GetError::Fragment(_) => {
                tracing::error!("GET FRAGMENT ERROR: {:?}", self);
                response::error(StatusCode::INTERNAL_SERVER_ERROR, "unable to get fragment")
            }
        }
    }
}
