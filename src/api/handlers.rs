//! API Handlers
//!
//! HTTP request handlers translating requests into cache operations.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::cache::{CacheSettings, LruTtlCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteAllResponse, DeleteResponse, GetAllResponse, GetResponse, HealthResponse, SetRequest,
    SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache handle is cheap to clone and synchronizes internally.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache of JSON values
    pub cache: LruTtlCache<Value>,
    /// TTL in seconds for requests without one
    pub default_ttl: u64,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: LruTtlCache<Value>, default_ttl: u64) -> Self {
        Self { cache, default_ttl }
    }

    /// Creates a new AppState from configuration and starts the sweeper.
    ///
    /// Must be called inside a tokio runtime.
    pub fn from_config(config: &Config, token: CancellationToken) -> Self {
        let cache = LruTtlCache::spawn(config.cache_settings(), token);
        Self::new(cache, config.default_ttl)
    }

    /// Creates an AppState with a sweeper-less cache, for tests and embedding.
    pub fn with_settings(settings: CacheSettings, default_ttl: u64) -> Self {
        Self::new(LruTtlCache::new(settings), default_ttl)
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair in the cache with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl_or(state.default_ttl);
    state.cache.set(req.key.clone(), req.value, ttl);

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key) {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /all
///
/// Returns every unexpired entry.
pub async fn get_all_handler(State(state): State<AppState>) -> Json<GetAllResponse> {
    Json(GetAllResponse {
        items: state.cache.get_all(),
    })
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if state.cache.delete(&key) {
        Ok(Json(DeleteResponse::new(key)))
    } else {
        Err(CacheError::NotFound(key))
    }
}

/// Handler for DELETE /all
pub async fn delete_all_handler(State(state): State<AppState>) -> Result<Json<DeleteAllResponse>> {
    if state.cache.delete_all() {
        Ok(Json(DeleteAllResponse::new()))
    } else {
        Err(CacheError::Empty)
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
