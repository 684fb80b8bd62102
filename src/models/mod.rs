// src/models/mod.rs

//! Domain models for the job search pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod job;
mod query;
mod result;

// Re-export all public types
pub use config::{
    ApiConfig, Config, HttpConfig, LimitsConfig, QueryDefaults, REFNR_PLACEHOLDER, RateConfig,
    RatePolicy,
};
pub use job::{DedupMap, EnrichedRecord, JobKey, RawRecord};
pub use query::SearchQuery;
pub use result::{ResultSet, SearchStats};
