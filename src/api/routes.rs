//! API Routes
//!
//! Configures the Axum router with all entry cache endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_handler, clear_handler, get_handler, health_handler, list_handler, pop_handler,
    popitem_handler, setdefault_handler, state_handler, stats_handler, update_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /entries` - Add an entry
/// - `GET /entries` - List entries (`?filter=`, `?type=`, `?now=`)
/// - `DELETE /entries` - Remove every entry
/// - `GET /entries/:id` - Describe an entry
/// - `PUT /entries/:id` - Update an entry
/// - `DELETE /entries/:id` - Remove an entry
/// - `PUT /entries/:id/default` - Insert-if-absent
/// - `GET /entries/:id/state` - Serialized entry state
/// - `POST /popitem` - Remove the newest entry
/// - `GET /stats` - Cache summary
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route(
            "/entries",
            post(add_handler).get(list_handler).delete(clear_handler),
        )
        .route(
            "/entries/:id",
            get(get_handler).put(update_handler).delete(pop_handler),
        )
        .route("/entries/:id/default", put(setdefault_handler))
        .route("/entries/:id/state", get(state_handler))
        .route("/popitem", post(popitem_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
