// src/services/search.rs

//! Paginated multi-keyword search.
//!
//! Pages each keyword until the service signals the end, then merges all
//! items into one deduplicated map.

use futures::stream::{self, StreamExt};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, Config, DedupMap, LimitsConfig, RawRecord, SearchQuery};
use crate::services::keys::derive_key;
use crate::services::throttle::{FetchOutcome, Throttle};
use crate::source::JobSource;

/// Top-level keys the item list may appear under, in lookup order.
pub const ITEM_LIST_FIELDS: [&str; 2] = ["stellenangebote", "content"];

/// Why paging stopped for a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The service answered with its out-of-range status
    OutOfRange,
    /// A page came back without items
    Exhausted,
    /// A page held fewer items than requested
    LastPage,
    /// `max_pages` pages were fetched
    PageLimit,
    /// Some other non-success status
    HttpStatus(u16),
    /// The body was not the expected JSON
    MalformedBody,
    /// The request itself failed
    Transport,
}

impl StopReason {
    /// Whether paging ended on a failure rather than the end of results.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            StopReason::HttpStatus(_) | StopReason::MalformedBody | StopReason::Transport
        )
    }
}

/// Items collected for one keyword.
#[derive(Debug, Clone)]
pub struct KeywordOutcome {
    pub keyword: String,
    pub records: Vec<RawRecord>,
    pub requests: usize,
    pub stop: StopReason,
}

/// Merged result of a whole search.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub jobs: DedupMap,
    pub keyword_count: usize,
    pub page_requests: usize,
    pub failed_keywords: usize,
}

/// One parsed search page.
#[derive(Debug)]
struct SearchPage {
    records: Vec<RawRecord>,
    item_count: usize,
}

impl SearchPage {
    fn parse(body: &str) -> Result<Self> {
        let data: Value = serde_json::from_str(body)?;
        if !data.is_object() {
            return Err(AppError::search("search page", "expected a JSON object"));
        }
        let items = ITEM_LIST_FIELDS
            .iter()
            .find_map(|field| match data.get(field) {
                Some(Value::Array(items)) if !items.is_empty() => Some(items.as_slice()),
                _ => None,
            })
            .unwrap_or_default();

        Ok(Self {
            records: items.iter().cloned().filter_map(RawRecord::from_value).collect(),
            item_count: items.len(),
        })
    }
}

/// Drives paginated queries against a [`JobSource`].
pub struct SearchFetcher<'a> {
    source: &'a dyn JobSource,
    api: &'a ApiConfig,
    limits: LimitsConfig,
    concurrency: usize,
    throttle: Throttle,
}

impl<'a> SearchFetcher<'a> {
    pub fn new(source: &'a dyn JobSource, config: &'a Config) -> Self {
        Self {
            source,
            api: &config.api,
            limits: config.limits,
            concurrency: config.http.max_concurrent.max(1),
            throttle: Throttle::new(config.rate.search),
        }
    }

    /// Page every non-blank keyword and merge the items, first writer wins.
    ///
    /// Keywords may be paged concurrently, but outcomes are merged in keyword
    /// order so the map is the same as for a sequential run.
    pub async fn fetch(&self, query: &SearchQuery) -> SearchOutcome {
        let keywords: Vec<&str> = query
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();

        let outcomes: Vec<KeywordOutcome> = stream::iter(keywords)
            .map(|keyword| self.fetch_keyword(query, keyword))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut merged = SearchOutcome {
            keyword_count: outcomes.len(),
            ..SearchOutcome::default()
        };

        for outcome in outcomes {
            merged.page_requests += outcome.requests;
            if outcome.stop.is_failure() {
                merged.failed_keywords += 1;
            }

            let found = outcome.records.len();
            let mut added = 0;
            for record in outcome.records {
                if merged.jobs.insert(derive_key(&record), record) {
                    added += 1;
                }
            }
            log::info!(
                "Keyword '{}': {} items in {} requests, {} new ({:?})",
                outcome.keyword,
                found,
                outcome.requests,
                added,
                outcome.stop
            );
        }

        merged
    }

    /// Page through one keyword until a termination rule fires.
    pub async fn fetch_keyword(&self, query: &SearchQuery, keyword: &str) -> KeywordOutcome {
        let mut outcome = KeywordOutcome {
            keyword: keyword.to_string(),
            records: Vec::new(),
            requests: 0,
            stop: StopReason::PageLimit,
        };

        for page in 1..=self.limits.max_pages {
            if let Some(stop) = self.fetch_page(query, keyword, page, &mut outcome).await {
                outcome.stop = stop;
                break;
            }
        }

        outcome
    }

    /// Fetch one page into `outcome`; `Some` ends paging for the keyword.
    async fn fetch_page(
        &self,
        query: &SearchQuery,
        keyword: &str,
        page: usize,
        outcome: &mut KeywordOutcome,
    ) -> Option<StopReason> {
        let params = query.page_params(self.api, keyword, page);
        let response = self.source.search_page(&params).await;
        outcome.requests += 1;

        let went_well = matches!(
            &response,
            Ok(p) if p.is_success() || p.status == self.api.out_of_range_status
        );
        self.throttle
            .pause(if went_well {
                FetchOutcome::Success
            } else {
                FetchOutcome::Failure
            })
            .await;

        let fetched = match response {
            Ok(fetched) => fetched,
            Err(e) => {
                log::warn!("Search request failed for '{keyword}' page {page}: {e}");
                return Some(StopReason::Transport);
            }
        };

        if fetched.status == self.api.out_of_range_status {
            log::debug!("'{keyword}': page {page} out of range");
            return Some(StopReason::OutOfRange);
        }
        if !fetched.is_success() {
            log::warn!(
                "Search for '{keyword}' page {page} returned status {}",
                fetched.status
            );
            return Some(StopReason::HttpStatus(fetched.status));
        }

        let parsed = match SearchPage::parse(&fetched.body) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("Unparseable search response for '{keyword}' page {page}: {e}");
                return Some(StopReason::MalformedBody);
            }
        };

        if parsed.item_count == 0 {
            return Some(StopReason::Exhausted);
        }

        let short = parsed.item_count < self.api.page_size;
        outcome.records.extend(parsed.records);
        short.then_some(StopReason::LastPage)
    }
}
