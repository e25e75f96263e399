//! API Handlers
//!
//! HTTP request handlers for each cache admin endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::manager::{CacheManager, CacheStats};
use crate::models::{
    ClearPatternQuery, ClearPatternResponse, DeleteResponse, GetResponse, HealthResponse,
    SetRequest, SetResponse,
};

/// Application state shared across all handlers.
///
/// The manager synchronizes internally, so it is shared as a plain `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Two-tier cache
    pub cache: Arc<CacheManager>,
    /// TTL for writes that don't specify one
    pub default_ttl: Duration,
}

impl AppState {
    /// Creates a new AppState around an existing manager.
    pub fn new(cache: Arc<CacheManager>, default_ttl: Duration) -> Self {
        Self { cache, default_ttl }
    }

    /// Creates a new AppState from configuration, connecting the remote tier.
    pub async fn from_config(config: &Config) -> Self {
        let cache = CacheManager::connect(config).await;
        Self::new(Arc::new(cache), config.default_ttl())
    }
}

/// Handler for PUT /set
///
/// Stores a JSON value in both tiers with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.map(Duration::from_secs).unwrap_or(state.default_ttl);
    state.cache.set(&req.key, req.value, ttl).await;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value, remote tier first.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from both tiers; 404 if neither held it.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if state.cache.delete(&key).await {
        Ok(Json(DeleteResponse::new(key)))
    } else {
        Err(CacheError::NotFound(key))
    }
}

/// Handler for DELETE /keys?pattern=...
///
/// Removes remote keys matching a glob pattern.
pub async fn clear_pattern_handler(
    State(state): State<AppState>,
    Query(query): Query<ClearPatternQuery>,
) -> Result<Json<ClearPatternResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let removed = state.cache.clear_pattern(&query.pattern).await;
    Ok(Json(ClearPatternResponse::new(query.pattern, removed)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.get_stats().await)
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.is_remote_available()))
}
