// src/services/details.rs

//! Detail-page enrichment.
//!
//! Fetches the human-facing page of each posting, up to a cap, and pulls a
//! contact email out of it. Nothing here fails the search: every problem
//! turns into "no email".

use std::collections::HashMap;

use futures::stream::{self, StreamExt};

use crate::models::{ApiConfig, Config, DedupMap, JobKey};
use crate::services::email::pick_email;
use crate::services::fields;
use crate::services::throttle::{FetchOutcome, Throttle};
use crate::source::JobSource;

/// Result of looking up one posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailLookup {
    /// No reference number, nothing fetched
    NoReference,
    /// Page fetched and an address found
    Email(String),
    /// Page fetched, no address on it
    NoEmail,
    /// Bad status or transport failure
    Failed,
}

impl DetailLookup {
    pub fn email(&self) -> &str {
        match self {
            DetailLookup::Email(email) => email.as_str(),
            _ => "",
        }
    }

    fn requested(&self) -> bool {
        !matches!(self, DetailLookup::NoReference)
    }
}

/// Emails found for the enriched entries.
#[derive(Debug, Default)]
pub struct DetailOutcome {
    /// One entry per processed record; records past the cap are absent
    pub emails: HashMap<JobKey, String>,
    pub requests: usize,
    pub failures: usize,
}

impl DetailOutcome {
    /// Email for a key, empty when none was found or the key was not processed.
    pub fn email_for(&self, key: &JobKey) -> &str {
        self.emails.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn emails_found(&self) -> usize {
        self.emails.values().filter(|e| !e.is_empty()).count()
    }
}

/// Looks up contact emails on detail pages.
pub struct DetailEnricher<'a> {
    source: &'a dyn JobSource,
    api: &'a ApiConfig,
    max_details: usize,
    concurrency: usize,
    throttle: Throttle,
}

impl<'a> DetailEnricher<'a> {
    pub fn new(source: &'a dyn JobSource, config: &'a Config) -> Self {
        Self {
            source,
            api: &config.api,
            max_details: config.limits.max_details,
            concurrency: config.http.max_concurrent.max(1),
            throttle: Throttle::new(config.rate.detail),
        }
    }

    /// Enrich the first `max_details` entries in map order.
    pub async fn enrich(&self, jobs: &DedupMap) -> DetailOutcome {
        if jobs.len() > self.max_details {
            log::info!(
                "Fetching details for {} of {} jobs (max_details)",
                self.max_details,
                jobs.len()
            );
        }

        let targets: Vec<(&JobKey, Option<String>)> = jobs
            .iter()
            .take(self.max_details)
            .map(|(key, record)| (key, fields::reference_number(record)))
            .collect();

        let lookups: Vec<(JobKey, DetailLookup)> = stream::iter(targets)
            .map(|(key, refnr)| async move {
                let lookup = self.lookup(refnr.as_deref()).await;
                (key.clone(), lookup)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut outcome = DetailOutcome::default();
        for (key, lookup) in lookups {
            if lookup.requested() {
                outcome.requests += 1;
            }
            if lookup == DetailLookup::Failed {
                outcome.failures += 1;
            }
            outcome.emails.insert(key, lookup.email().to_string());
        }

        log::info!(
            "Details: {} requests, {} failed, {} emails found",
            outcome.requests,
            outcome.failures,
            outcome.emails_found()
        );
        outcome
    }

    /// Fetch one detail page and extract its contact email.
    pub async fn lookup(&self, refnr: Option<&str>) -> DetailLookup {
        let Some(refnr) = refnr else {
            return DetailLookup::NoReference;
        };

        let url = self.api.detail_url(refnr);
        let response = self.source.detail_page(&url).await;

        let lookup = match response {
            Ok(page) if page.is_success() => match pick_email(&page.body) {
                Some(email) => DetailLookup::Email(email),
                None => DetailLookup::NoEmail,
            },
            Ok(page) => {
                log::debug!("Detail page {url} returned status {}", page.status);
                DetailLookup::Failed
            }
            Err(e) => {
                log::warn!("Detail request failed for {url}: {e}");
                DetailLookup::Failed
            }
        };

        let outcome = if lookup == DetailLookup::Failed {
            FetchOutcome::Failure
        } else {
            FetchOutcome::Success
        };
        self.throttle.pause(outcome).await;

        lookup
    }
}
