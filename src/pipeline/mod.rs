//! Pipeline entry points for job searches.
//!
//! - `run_search`: Fetch, deduplicate, enrich and assemble results
//! - `search_or_empty`: Same, degrading any failure to an empty result set

pub mod assemble;
pub mod search;

pub use assemble::{assemble, assemble_record};
pub use search::{SearchOptions, run_search, search_or_empty};
