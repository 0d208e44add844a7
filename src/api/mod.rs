//! API Module
//!
//! HTTP handlers and routing exposing the cache over a REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key
//! - `GET /all` - Retrieve every unexpired entry
//! - `DELETE /del/:key` - Delete a key
//! - `DELETE /all` - Delete every key
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
