use axum::http::header::CACHE_CONTROL;
use axum::http::StatusCode;
use axum::response::Response;
use serde::Serialize;

use common::prelude::build_info;

use super::response;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    version: &'static str,
    github_url: &'static str,
}

#[tracing::instrument]
pub async fn handler() -> Response {
    let health = Health {
        version: build_info().version,
        github_url: env!("CARGO_PKG_REPOSITORY"),
    };
    let mut response = response::success(StatusCode::OK, health);
    response
        .headers_mut()
        .insert(CACHE_CONTROL, http::HeaderValue::from_static("no-cache"));
    response
}
