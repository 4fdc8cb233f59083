pub mod api;
pub mod config;
pub mod error;
pub mod focas;
pub mod link;
pub mod logging;
pub mod state;
pub mod test_util;

pub use config::Config;
pub use error::LinkError;
pub use focas::{FocasDriver, FocasLibrary};
pub use link::{CncLink, ConnectParams, LinkState};
pub use state::AppState;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Assemble the full HTTP surface: the FOCAS API, `/health`, CORS and
/// request logging.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest(api::API_PREFIX, api::router())
        .route("/health", get(api::health::health))
        .layer(middleware::from_fn(logging::request_logger))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
