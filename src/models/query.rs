//! Search query as entered by the user.

use serde::{Deserialize, Serialize};

use crate::models::{ApiConfig, QueryDefaults};

/// A multi-keyword search around a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Keywords in input order; duplicates are kept
    pub keywords: Vec<String>,

    /// Postal code and/or town (`wo`)
    pub location: String,

    /// Search radius in kilometres (`umkreis`)
    pub radius_km: u32,

    /// Ask the endpoint to leave out temporary-staffing agencies
    pub exclude_staffing_agencies: bool,
}

impl SearchQuery {
    /// Build a query from a raw comma-separated keyword string.
    pub fn new(
        raw_keywords: &str,
        location: impl Into<String>,
        radius_km: u32,
        exclude_staffing_agencies: bool,
    ) -> Self {
        Self {
            keywords: Self::split_keywords(raw_keywords),
            location: location.into(),
            radius_km,
            exclude_staffing_agencies,
        }
    }

    /// Query prefilled from configured defaults.
    pub fn from_defaults(defaults: &QueryDefaults) -> Self {
        Self::new(
            &defaults.keywords,
            defaults.location.clone(),
            defaults.radius_km,
            defaults.exclude_staffing_agencies,
        )
    }

    /// Split on commas, trim, drop empty segments.
    pub fn split_keywords(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Parameters shared by every page request of this query.
    pub fn base_params(&self, api: &ApiConfig) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("wo", self.location.clone()),
            ("umkreis", self.radius_km.to_string()),
            ("angebotsart", api.offer_type.to_string()),
            ("size", api.page_size.to_string()),
        ];
        if self.exclude_staffing_agencies {
            params.push(("pav", "false".to_string()));
            params.push(("zeitarbeit", "false".to_string()));
        }
        params
    }

    /// Full parameter list for one page of one keyword.
    pub fn page_params(
        &self,
        api: &ApiConfig,
        keyword: &str,
        page: usize,
    ) -> Vec<(&'static str, String)> {
        let mut params = self.base_params(api);
        params.push(("was", keyword.to_string()));
        params.push(("page", page.to_string()));
        params
    }
}
