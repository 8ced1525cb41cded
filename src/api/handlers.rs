//! API Handlers
//!
//! HTTP request handlers for each entry cache endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::cache::Cache;
use crate::error::{CacheError, Result};
use crate::models::{
    AddEntryRequest, DeleteResponse, EntryFilter, EntryListResponse, EntryResponse,
    HealthResponse, ListQuery, SetDefaultRequest, StateResponse, StatsResponse,
    UpdateEntryRequest,
};

/// Application state shared across all handlers.
///
/// Contains the cache wrapped in Arc<RwLock<>>: read-only operations share
/// the read lock, mutations take the write lock.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe entry cache
    pub cache: Arc<RwLock<Cache<u64>>>,
    /// Max age applied to added entries that don't specify one
    pub default_max_age: Option<i64>,
}

impl AppState {
    /// Creates a new AppState with the given cache.
    pub fn new(cache: Cache<u64>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            default_max_age: None,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        let mut state = Self::new(Cache::new());
        state.default_max_age = config.default_max_age();
        state
    }
}

/// Handler for POST /entries
///
/// Adds a new entry; fails with 409 if the id is taken.
pub async fn add_handler(
    State(state): State<AppState>,
    Json(req): Json<AddEntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>)> {
    let value = req.value.into_cache_value()?;
    let max_age = req.max_age.or(state.default_max_age);

    let mut cache = state.cache.write().await;
    let now = cache.now();
    let entry = cache.add(req.id, value, req.fetched_time, max_age)?;

    Ok((StatusCode::CREATED, Json(EntryResponse::new(entry, now))))
}

/// Handler for GET /entries
///
/// Lists entries in insertion order, optionally filtered by state and type.
pub async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<EntryListResponse>> {
    let filter = query.entry_filter()?;
    let value_type = query.type_filter()?;

    let cache = state.cache.read().await;
    let now = query.now.unwrap_or_else(|| cache.now());

    let view = match (filter, value_type) {
        (EntryFilter::All, Some(value_type)) => cache.by_type(value_type),
        (EntryFilter::All, None) => cache.copy(),
        (EntryFilter::Stale, _) => cache.stale(now),
        (EntryFilter::Fresh, _) => cache.fresh(now),
        (EntryFilter::Mutable, _) => cache.mutable(),
        (EntryFilter::Immutable, _) => cache.immutable(),
    };

    let entries = view
        .values()
        .filter(|entry| value_type.map_or(true, |t| entry.value_type() == t))
        .map(|entry| EntryResponse::new(entry, now))
        .collect();

    Ok(Json(EntryListResponse::new(now, entries)))
}

/// Handler for DELETE /entries
///
/// Removes every entry.
pub async fn clear_handler(State(state): State<AppState>) -> Json<DeleteResponse> {
    let mut cache = state.cache.write().await;
    let removed = cache.len();
    cache.clear();

    Json(DeleteResponse::cleared(removed))
}

/// Handler for GET /entries/:id
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<EntryResponse>> {
    let cache = state.cache.read().await;
    let entry = cache
        .get(&id)
        .ok_or_else(|| CacheError::NotFound(id.to_string()))?;

    Ok(Json(EntryResponse::new(entry, cache.now())))
}

/// Handler for PUT /entries/:id
///
/// Replaces an immutable value or patches a mutable one.
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<Json<EntryResponse>> {
    let value = req.value.into_cache_value()?;

    let mut cache = state.cache.write().await;
    cache.update(&id, value, req.fetched_time)?;

    let entry = cache
        .get(&id)
        .ok_or_else(|| CacheError::NotFound(id.to_string()))?;
    Ok(Json(EntryResponse::new(entry, cache.now())))
}

/// Handler for DELETE /entries/:id
pub async fn pop_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>> {
    let mut cache = state.cache.write().await;
    cache.pop(&id)?;

    Ok(Json(DeleteResponse::entry(id)))
}

/// Handler for PUT /entries/:id/default
///
/// Returns the existing entry, or stores the given value fetched now.
pub async fn setdefault_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<SetDefaultRequest>,
) -> Result<Json<EntryResponse>> {
    let value = req.value.into_cache_value()?;

    let mut cache = state.cache.write().await;
    let now = cache.now();
    let entry = cache.setdefault(id, value)?;

    Ok(Json(EntryResponse::new(entry, now)))
}

/// Handler for GET /entries/:id/state
///
/// Returns the entry's serialized state.
pub async fn state_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<StateResponse>> {
    let cache = state.cache.read().await;
    let entry = cache
        .get(&id)
        .ok_or_else(|| CacheError::NotFound(id.to_string()))?;

    Ok(Json(StateResponse {
        id,
        state: entry.serialize(),
    }))
}

/// Handler for POST /popitem
///
/// Removes and returns the most recently inserted entry.
pub async fn popitem_handler(State(state): State<AppState>) -> Result<Json<EntryResponse>> {
    let mut cache = state.cache.write().await;
    let now = cache.now();
    let (_, entry) = cache.popitem()?;

    Ok(Json(EntryResponse::new(&entry, now)))
}

/// Handler for GET /stats
///
/// Returns counts by freshness, kind and type.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::new(cache.summary(cache.now())))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
