/// HTTP surface of the import service
///
/// A small REST API for triggering, polling, cancelling and listing import
/// jobs. The pipeline itself never depends on this layer.
pub mod dto;
pub mod error;
pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use handlers::ApiState;
use tower_http::trace::TraceLayer;

pub use handlers::ApiState as AppState;

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/import-jobs",
            post(handlers::create_job).get(handlers::list_jobs),
        )
        .route("/import-jobs/{id}", get(handlers::get_job))
        .route("/import-jobs/{id}/cancel", post(handlers::cancel_job))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
