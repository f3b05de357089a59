//! API Module
//!
//! HTTP handlers and routing for the store REST API.
//!
//! # Endpoints
//! - `PUT /put` - Store a key-value pair
//! - `POST /put_if_absent` - Store a key-value pair if the key is new
//! - `PUT /set` - Replace the value of an existing key
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint
//!
//! Keys in path segments must be percent-encoded.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
