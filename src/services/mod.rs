//! Service layer for the job search pipeline.
//!
//! This module contains the business logic for:
//! - Field resolution from raw items (`fields`)
//! - Deduplication keys (`keys`)
//! - Paginated searching (`SearchFetcher`)
//! - Detail-page enrichment (`DetailEnricher`)
//! - Email extraction (`email`)
//! - Rate limiting (`Throttle`)

mod details;
pub mod email;
pub mod fields;
pub mod keys;
mod search;
mod throttle;

pub use details::{DetailEnricher, DetailLookup, DetailOutcome};
pub use fields::ResolvedFields;
pub use keys::derive_key;
pub use search::{KeywordOutcome, SearchFetcher, SearchOutcome, StopReason};
pub use throttle::{FetchOutcome, Throttle};
