//! Entity CRUD routes: one block of five routes per resource.

use crate::handlers::{create_host, create_host_group, delete, find, list, read, update};
use crate::models::{Host, HostGroup};
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::limit::RequestBodyLimitLayer;

/// Request bodies are small JSON objects.
const BODY_LIMIT: usize = 64 * 1024;

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .route("/hosts", get(list::<Host>).post(create_host))
        .route("/hosts/find", get(find::<Host>))
        .route(
            "/hosts/:id",
            get(read::<Host>).patch(update::<Host>).delete(delete::<Host>),
        )
        .route("/host-groups", get(list::<HostGroup>).post(create_host_group))
        .route("/host-groups/find", get(find::<HostGroup>))
        .route(
            "/host-groups/:id",
            get(read::<HostGroup>)
                .patch(update::<HostGroup>)
                .delete(delete::<HostGroup>),
        )
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .with_state(state)
}
