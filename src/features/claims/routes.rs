use std::sync::Arc;

use axum::{
    routing::{post, put},
    Router,
};

use crate::features::claims::handlers;
use crate::features::claims::services::ClaimService;

/// Create routes for the claims feature
pub fn routes(service: Arc<ClaimService>) -> Router {
    Router::new()
        .route(
            "/api/claims",
            post(handlers::submit_claim).get(handlers::list_claims),
        )
        .route("/api/claims/{id}/approve", put(handlers::approve_claim))
        .route("/api/claims/{id}/reject", put(handlers::reject_claim))
        .with_state(service)
}
