use axum::extract::State;
use axum::http::header::{CONTENT_TYPE, HOST, LOCATION};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use bytes::Bytes;
use serde::Serialize;

use common::fragment::{Fragment, FragmentError, NewFragment, ValidationError};
use common::media;

use crate::http_server::auth::Owner;
use crate::http_server::{response, Config};
use crate::ServiceState;

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub fragment: Fragment,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Extension(config): Extension<Config>,
    owner: Owner,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, CreateError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .ok_or(CreateError::MissingContentType)?
        .to_str()
        .map_err(|_| CreateError::InvalidContentType)?;

    let base = media::essence(content_type).ok_or(CreateError::InvalidContentType)?;
    if !media::is_supported_type(&base) {
        return Err(CreateError::UnsupportedType(base));
    }

    let store = state.store();
    let mut fragment = Fragment::new(NewFragment::new(owner.id(), content_type))
        .map_err(FragmentError::from)?;
    fragment.save(store).await?;
    fragment.set_data(store, body).await?;

    tracing::info!(
        owner_id = owner.id(),
        id = fragment.id(),
        fragment_type = fragment.fragment_type(),
        size = fragment.size(),
        "fragment created"
    );

    let host = headers.get(HOST).and_then(|h| h.to_str().ok());
    let location = config.fragment_url(host, fragment.id());

    let mut response = response::success(StatusCode::CREATED, CreateResponse { fragment });
    if let Ok(location) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(LOCATION, location);
    }
    Ok(response)
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("Content-Type header is required")]
    MissingContentType,
    #[error("invalid Content-Type header")]
    InvalidContentType,
    #[error("unsupported media type: {0}")]
    UnsupportedType(String),
    #[error("fragment error: {0}")]
    Fragment(#[from] FragmentError),
}

impl IntoResponse for CreateError {
    fn into_response(self) -> Response {
        match self {
            CreateError::MissingContentType | CreateError::InvalidContentType => {
                tracing::warn!("CREATE FRAGMENT ERROR: {}", self);
                response::error(StatusCode::BAD_REQUEST, self.to_string())
            }
            CreateError::UnsupportedType(_)
            | CreateError::Fragment(FragmentError::Validation(ValidationError::UnsupportedType(
                _,
            ))) => {
                tracing::warn!("CREATE FRAGMENT ERROR: {}", self);
                response::error(StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string())
            }
            CreateError::Fragment(FragmentError::Validation(e)) => {
                tracing::warn!("CREATE FRAGMENT ERROR: {}", e);
                response::error(StatusCode::BAD_REQUEST, e.to_string())
            }
            CreateError::Fragment(e) => {
                tracing::error!("CREATE FRAGMENT ERROR: {:?}", e);
                response::error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "unable to create fragment",
                )
            }
        }
    }
}
