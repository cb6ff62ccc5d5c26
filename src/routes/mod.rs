use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod health;
pub mod triggers;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Document-creation triggers
        .nest("/triggers", triggers::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
