use axum::http::{StatusCode, Uri};
use axum::response::Response;

use crate::http_server::response;

pub async fn not_found_handler(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "no route");
    response::error(StatusCode::NOT_FOUND, "not found")
}
