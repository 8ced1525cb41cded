//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Staleness Monitor: Logs a summary of stale entries at configured intervals

mod monitor;

pub use monitor::{report_staleness, spawn_staleness_monitor};
