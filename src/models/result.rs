//! Outcome of one search run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::EnrichedRecord;

/// Counters collected while a search runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub keyword_count: usize,
    pub page_requests: usize,
    pub unique_jobs: usize,
    pub detail_requests: usize,
    pub emails_found: usize,
}

impl SearchStats {
    /// Empty stats stamped with the current time.
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            start_time: now,
            end_time: now,
            keyword_count: 0,
            page_requests: 0,
            unique_jobs: 0,
            detail_requests: 0,
            emails_found: 0,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

/// Ordered search results owned by the request that produced them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultSet {
    pub records: Vec<EnrichedRecord>,
    pub stats: SearchStats,
}

impl ResultSet {
    /// A result set with no records, used when a search fails outright.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            stats: SearchStats::empty(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
