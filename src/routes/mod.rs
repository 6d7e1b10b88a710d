pub mod applications;
pub mod health;

use axum::{routing::get, Router};

use crate::AppState;

/// Every route of the applications API, state attached, no layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/applications",
            get(applications::list_applications).post(applications::create_application),
        )
        .route("/applications/stats", get(applications::application_stats))
        .route(
            "/applications/:id",
            get(applications::get_application)
                .put(applications::update_application)
                .delete(applications::delete_application),
        )
        .route(
            "/applications/:id/status",
            axum::routing::patch(applications::update_application_status),
        )
        .with_state(state)
}
