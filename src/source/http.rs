//! reqwest-backed [`JobSource`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::{ApiConfig, Config};
use crate::source::{FetchedPage, JobSource};
use crate::utils::http::create_client;

/// Talks to the live search and detail endpoints.
pub struct HttpJobSource {
    client: Client,
    api: ApiConfig,
    search_timeout: Duration,
    detail_timeout: Duration,
}

impl HttpJobSource {
    /// Create a source with a client built from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = create_client(&config.api, &config.http)?;
        Ok(Self::with_client(client, config))
    }

    /// Create a source around an existing client.
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            api: config.api.clone(),
            search_timeout: Duration::from_secs(config.http.search_timeout_secs),
            detail_timeout: Duration::from_secs(config.http.detail_timeout_secs),
        }
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    async fn search_page(&self, params: &[(&'static str, String)]) -> Result<FetchedPage> {
        let response = self
            .client
            .get(&self.api.search_url)
            .header("X-API-Key", &self.api.api_key)
            .query(params)
            .timeout(self.search_timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FetchedPage { status, body })
    }

    async fn detail_page(&self, url: &str) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url)
            .timeout(self.detail_timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FetchedPage { status, body })
    }
}
