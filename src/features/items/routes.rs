use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::items::handlers;
use crate::features::items::services::ItemService;

/// Create routes for the items feature
pub fn routes(service: Arc<ItemService>) -> Router {
    Router::new()
        .route(
            "/api/items",
            post(handlers::submit_item).get(handlers::list_items),
        )
        .route(
            "/api/items/{id}",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route("/api/items/{id}/found", put(handlers::mark_item_found))
        .route("/api/items/{id}/approve", post(handlers::approve_item))
        .route("/api/items/{id}/reject", post(handlers::reject_item))
        .with_state(service)
}
