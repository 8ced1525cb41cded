//! API Module
//!
//! HTTP handlers and routing for the entry cache REST API.
//!
//! # Endpoints
//! - `POST|GET|DELETE /entries` - Add, list, clear
//! - `GET|PUT|DELETE /entries/:id` - Get, update, pop
//! - `PUT /entries/:id/default` - Insert-if-absent
//! - `GET /entries/:id/state` - Serialized entry state
//! - `POST /popitem` - Remove the newest entry
//! - `GET /stats` - Cache summary
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
