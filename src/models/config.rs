//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Placeholder substituted with the reference number in detail URLs.
pub const REFNR_PLACEHOLDER: &str = "{refnr}";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search and detail endpoint settings
    #[serde(default)]
    pub api: ApiConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Hard upper bounds on pages and detail fetches
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Rate-limit policies per request kind
    #[serde(default)]
    pub rate: RateConfig,

    /// Query defaults used when the caller leaves a field out
    #[serde(default)]
    pub defaults: QueryDefaults,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.page_size == 0 {
            return Err(AppError::validation("api.page_size must be > 0"));
        }
        url::Url::parse(&self.api.search_url)?;
        if !self.api.detail_url_template.contains(REFNR_PLACEHOLDER) {
            return Err(AppError::validation(format!(
                "api.detail_url_template must contain {REFNR_PLACEHOLDER}"
            )));
        }
        if self.http.search_timeout_secs == 0 || self.http.detail_timeout_secs == 0 {
            return Err(AppError::validation("http timeouts must be > 0"));
        }
        if self.http.max_concurrent == 0 {
            return Err(AppError::validation("http.max_concurrent must be > 0"));
        }
        if self.limits.max_pages == 0 {
            return Err(AppError::validation("limits.max_pages must be > 0"));
        }
        self.rate.search.validate("rate.search")?;
        self.rate.detail.validate("rate.detail")?;
        Ok(())
    }
}

/// Endpoint locations and fixed request parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Paginated search endpoint
    #[serde(default = "defaults::search_url")]
    pub search_url: String,

    /// Human-facing detail page, `{refnr}` is replaced by the reference number
    #[serde(default = "defaults::detail_url_template")]
    pub detail_url_template: String,

    /// Value of the `X-API-Key` header on search requests
    #[serde(default = "defaults::api_key")]
    pub api_key: String,

    /// User-Agent header for all requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Items requested per page
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,

    /// Offer type (`angebotsart`), 1 = regular employment
    #[serde(default = "defaults::offer_type")]
    pub offer_type: u32,

    /// Status the search endpoint answers with once `page` runs past the results
    #[serde(default = "defaults::out_of_range_status")]
    pub out_of_range_status: u16,
}

impl ApiConfig {
    /// Detail page URL for a reference number.
    pub fn detail_url(&self, refnr: &str) -> String {
        self.detail_url_template.replace(REFNR_PLACEHOLDER, refnr)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            search_url: defaults::search_url(),
            detail_url_template: defaults::detail_url_template(),
            api_key: defaults::api_key(),
            user_agent: defaults::user_agent(),
            page_size: defaults::page_size(),
            offer_type: defaults::offer_type(),
            out_of_range_status: defaults::out_of_range_status(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout for search page requests in seconds
    #[serde(default = "defaults::search_timeout")]
    pub search_timeout_secs: u64,

    /// Timeout for detail page requests in seconds
    #[serde(default = "defaults::detail_timeout")]
    pub detail_timeout_secs: u64,

    /// Skip TLS certificate validation (some deployments sit behind intercepting proxies)
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Keywords paged / detail pages fetched at the same time; 1 is strictly sequential
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            search_timeout_secs: defaults::search_timeout(),
            detail_timeout_secs: defaults::detail_timeout(),
            accept_invalid_certs: false,
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Upper bounds that cap worst-case latency of one search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Pages requested per keyword
    #[serde(default = "defaults::max_pages")]
    pub max_pages: usize,

    /// Deduplicated records whose detail page is fetched
    #[serde(default = "defaults::max_details")]
    pub max_details: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_pages: defaults::max_pages(),
            max_details: defaults::max_details(),
        }
    }
}

/// Rate-limit policy applied after each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RatePolicy {
    /// No pause between requests
    Disabled,
    /// Constant pause after every request
    Fixed { delay_ms: u64 },
    /// `base_ms` after success, doubling per consecutive failure up to `max_ms`
    Backoff { base_ms: u64, max_ms: u64 },
    /// Bursts of up to `capacity` requests, then one per `refill_ms`
    TokenBucket { capacity: u32, refill_ms: u64 },
}

impl RatePolicy {
    fn validate(&self, name: &str) -> Result<()> {
        match *self {
            RatePolicy::TokenBucket { capacity, refill_ms } if capacity == 0 || refill_ms == 0 => {
                Err(AppError::validation(format!(
                    "{name}: token bucket needs capacity > 0 and refill_ms > 0"
                )))
            }
            RatePolicy::Backoff { base_ms, max_ms } if max_ms < base_ms => Err(
                AppError::validation(format!("{name}: backoff max_ms must be >= base_ms")),
            ),
            _ => Ok(()),
        }
    }
}

/// Rate policies for the two request kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateConfig {
    #[serde(default = "defaults::search_rate")]
    pub search: RatePolicy,

    #[serde(default = "defaults::detail_rate")]
    pub detail: RatePolicy,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            search: defaults::search_rate(),
            detail: defaults::detail_rate(),
        }
    }
}

/// Defaults for the search form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDefaults {
    /// Comma-separated keywords
    #[serde(default = "defaults::keywords")]
    pub keywords: String,

    /// Postal code and/or town
    #[serde(default = "defaults::location")]
    pub location: String,

    #[serde(default = "defaults::radius_km")]
    pub radius_km: u32,

    #[serde(default = "defaults::exclude_staffing_agencies")]
    pub exclude_staffing_agencies: bool,

    /// File name offered for CSV export
    #[serde(default = "defaults::export_file")]
    pub export_file: String,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            keywords: defaults::keywords(),
            location: defaults::location(),
            radius_km: defaults::radius_km(),
            exclude_staffing_agencies: defaults::exclude_staffing_agencies(),
            export_file: defaults::export_file(),
        }
    }
}

mod defaults {
    use super::RatePolicy;

    // Api defaults
    pub fn search_url() -> String {
        "https://rest.arbeitsagentur.de/jobboerse/jobsuche-service/pc/v4/jobs".into()
    }
    pub fn detail_url_template() -> String {
        "https://www.arbeitsagentur.de/jobsuche/jobdetail/{refnr}".into()
    }
    pub fn api_key() -> String {
        "jobboerse-jobsuche".into()
    }
    pub fn user_agent() -> String {
        "JobSearchBot/1.0".into()
    }
    pub fn page_size() -> usize {
        100
    }
    pub fn offer_type() -> u32 {
        1
    }
    pub fn out_of_range_status() -> u16 {
        400
    }

    // Http defaults
    pub fn search_timeout() -> u64 {
        60
    }
    pub fn detail_timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        1
    }

    // Limits
    pub fn max_pages() -> usize {
        50
    }
    pub fn max_details() -> usize {
        100
    }

    // Rate limiting
    pub fn search_rate() -> RatePolicy {
        RatePolicy::Fixed { delay_ms: 200 }
    }
    pub fn detail_rate() -> RatePolicy {
        RatePolicy::Fixed { delay_ms: 250 }
    }

    // Query form
    pub fn keywords() -> String {
        "Schweißer".into()
    }
    pub fn location() -> String {
        "33689 Bielefeld".into()
    }
    pub fn radius_km() -> u32 {
        25
    }
    pub fn exclude_staffing_agencies() -> bool {
        true
    }
    pub fn export_file() -> String {
        "jobs_ba.csv".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.api.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.http.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_template_without_placeholder() {
        let mut config = Config::default();
        config.api.detail_url_template = "https://example.com/job".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_token_bucket() {
        let mut config = Config::default();
        config.rate.detail = RatePolicy::TokenBucket {
            capacity: 0,
            refill_ms: 100,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [http]
            accept_invalid_certs = true

            [limits]
            max_details = 40

            [rate.search]
            policy = "backoff"
            base_ms = 100
            max_ms = 5000
            "#,
        )
        .unwrap();

        assert!(config.http.accept_invalid_certs);
        assert_eq!(config.http.search_timeout_secs, 60);
        assert_eq!(config.limits.max_details, 40);
        assert_eq!(config.limits.max_pages, 50);
        assert_eq!(
            config.rate.search,
            RatePolicy::Backoff {
                base_ms: 100,
                max_ms: 5000
            }
        );
        assert_eq!(config.rate.detail, RatePolicy::Fixed { delay_ms: 250 });
        assert_eq!(config.api.page_size, 100);
    }

    #[test]
    fn detail_url_substitutes_refnr() {
        let api = ApiConfig::default();
        assert_eq!(
            api.detail_url("10000-1198771380-S"),
            "https://www.arbeitsagentur.de/jobsuche/jobdetail/10000-1198771380-S"
        );
    }

    #[test]
    fn shipped_config_is_valid() {
        let config: Config = toml::from_str(include_str!("../../config.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.rate.detail, RatePolicy::Fixed { delay_ms: 250 });
    }

    #[test]
    fn load_or_default_falls_back() {
        let config = Config::load_or_default("does/not/exist.toml");
        assert_eq!(config.defaults.radius_km, 25);
    }
}
