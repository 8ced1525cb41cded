//! Request and Response models for the entry cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    AddEntryRequest, EntryFilter, ListQuery, SetDefaultRequest, UpdateEntryRequest, ValueDto,
};
pub use responses::{
    value_to_json, DeleteResponse, EntryListResponse, EntryResponse, ErrorResponse,
    HealthResponse, StateResponse, StatsResponse,
};
