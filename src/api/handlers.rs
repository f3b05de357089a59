//! API Handlers
//!
//! HTTP request handlers for each store endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::SimpleLru;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, EntryRequest, GetResponse, HealthResponse, StatsResponse, WriteResponse,
};
use crate::storage::Storage;

/// Application state shared across all handlers.
///
/// The store itself is single-threaded; the lock serializes every call into
/// it. Reads take the write lock too, since a read reorders recency.
#[derive(Clone)]
pub struct AppState {
    /// Serialized access to the store
    pub cache: Arc<RwLock<SimpleLru>>,
}

impl AppState {
    /// Creates a new AppState with the given store.
    pub fn new(cache: SimpleLru) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(SimpleLru::new(config.max_size))
    }
}

fn validated(req: &EntryRequest) -> Result<()> {
    match req.validate() {
        Some(error_msg) => Err(CacheError::InvalidRequest(error_msg)),
        None => Ok(()),
    }
}

/// Handler for PUT /put
///
/// Stores a key-value pair, replacing any previous value.
pub async fn put_handler(
    State(state): State<AppState>,
    Json(req): Json<EntryRequest>,
) -> Result<Json<WriteResponse>> {
    validated(&req)?;

    let mut cache = state.cache.write().await;
    cache.put(req.key.clone(), req.value)?;

    Ok(Json(WriteResponse::new(req.key, "stored")))
}

/// Handler for POST /put_if_absent
///
/// Stores a key-value pair only if the key is not present yet.
pub async fn put_if_absent_handler(
    State(state): State<AppState>,
    Json(req): Json<EntryRequest>,
) -> Result<Json<WriteResponse>> {
    validated(&req)?;

    let mut cache = state.cache.write().await;
    cache.put_if_absent(req.key.clone(), req.value)?;

    Ok(Json(WriteResponse::new(req.key, "inserted")))
}

/// Handler for PUT /set
///
/// Replaces the value of an existing key.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<EntryRequest>,
) -> Result<Json<WriteResponse>> {
    validated(&req)?;

    let mut cache = state.cache.write().await;
    cache.set(req.key.clone(), req.value)?;

    Ok(Json(WriteResponse::new(req.key, "updated")))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: a hit promotes the entry
    let mut cache = state.cache.write().await;
    let value = cache.get(&key)?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let mut cache = state.cache.write().await;
    cache.delete(&key)?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::from(cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
