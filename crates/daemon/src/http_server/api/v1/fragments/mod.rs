use axum::routing::get;
use axum::Router;

use crate::ServiceState;

pub mod create;
pub mod delete;
pub mod get;
pub mod info;
pub mod list;
pub mod update;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(list::handler).post(create::handler))
        .route(
            "/:id",
            get(get::handler)
                .put(update::handler)
                .delete(delete::handler),
        )
        .route("/:id/info", get(info::handler))
        .with_state(state)
}
