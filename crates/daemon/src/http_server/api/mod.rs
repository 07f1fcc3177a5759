use axum::Router;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, LOCATION, ORIGIN};
use http::Method;
use tower_http::cors::{Any, CorsLayer};

pub mod v1;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(vec![ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN])
        .expose_headers(vec![LOCATION])
        .allow_origin(Any)
        .allow_credentials(false);

    Router::new()
        .nest("/v1", v1::router(state.clone()))
        .with_state(state)
        .layer(cors_layer)
}
