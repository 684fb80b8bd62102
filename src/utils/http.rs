// src/utils/http.rs

//! HTTP client utilities.

use reqwest::Client;

use crate::error::Result;
use crate::models::{ApiConfig, HttpConfig};

/// Create a configured asynchronous HTTP client.
///
/// Timeouts are applied per request since search and detail pages use
/// different budgets.
pub fn create_client(api: &ApiConfig, http: &HttpConfig) -> Result<Client> {
    if http.accept_invalid_certs {
        log::warn!("TLS certificate validation is disabled");
    }

    let client = Client::builder()
        .user_agent(&api.user_agent)
        .danger_accept_invalid_certs(http.accept_invalid_certs)
        .build()?;
    Ok(client)
}
