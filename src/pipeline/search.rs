// src/pipeline/search.rs

//! Fetch, deduplicate, enrich and assemble one search.

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, ResultSet, SearchQuery, SearchStats};
use crate::services::{DetailEnricher, SearchFetcher};
use crate::source::JobSource;

use super::assemble::assemble;

/// Caller choices that do not affect fetching.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Drop records without a contact email from the result
    pub email_only: bool,
}

/// Run the search pipeline and return its results.
pub async fn run_search(
    config: &Config,
    source: &dyn JobSource,
    query: &SearchQuery,
    options: SearchOptions,
) -> Result<ResultSet> {
    config.validate()?;

    let start_time = Utc::now();
    log::info!(
        "Searching {} keyword(s) within {} km of '{}'",
        query.keywords.len(),
        query.radius_km,
        query.location
    );

    let search = SearchFetcher::new(source, config).fetch(query).await;
    log::info!(
        "Found {} unique jobs in {} page requests",
        search.jobs.len(),
        search.page_requests
    );

    let details = DetailEnricher::new(source, config).enrich(&search.jobs).await;
    let records = assemble(&search.jobs, &details, &config.api, options.email_only);

    let stats = SearchStats {
        start_time,
        end_time: Utc::now(),
        keyword_count: search.keyword_count,
        page_requests: search.page_requests,
        unique_jobs: search.jobs.len(),
        detail_requests: details.requests,
        emails_found: details.emails_found(),
    };

    log::info!(
        "Search complete: {} records, {} with email, {:.1}s",
        records.len(),
        stats.emails_found,
        stats.elapsed_secs()
    );

    Ok(ResultSet { records, stats })
}

/// Like [`run_search`], but a failed search yields an empty result set.
pub async fn search_or_empty(
    config: &Config,
    source: &dyn JobSource,
    query: &SearchQuery,
    options: SearchOptions,
) -> ResultSet {
    match run_search(config, source, query, options).await {
        Ok(result) => result,
        Err(e) => {
            log::error!("Search failed, returning no results: {e}");
            ResultSet::empty()
        }
    }
}
