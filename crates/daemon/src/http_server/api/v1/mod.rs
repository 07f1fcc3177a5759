use axum::Router;

pub mod fragments;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/fragments", fragments::router(state.clone()))
        .with_state(state)
}
