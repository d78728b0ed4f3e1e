//! Application state management for the API Gateway
//!
//! Holds the loaded configuration and the single outbound HTTP client. Nothing
//! here is mutated after startup.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::info;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::services::{backend::BackendClient, hosting::HostingClient};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http_client: Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let http_client = create_http_client(&config)?;
        info!("HTTP client initialized");

        Ok(Self {
            config: Arc::new(config),
            http_client,
        })
    }

    /// Backend client, or a configuration error if its URL or token is unset
    pub fn backend(&self) -> Result<BackendClient<'_>> {
        let backend = &self.config.backend;
        match (present(&backend.api_url), present(&backend.api_token)) {
            (Some(url), Some(token)) => Ok(BackendClient::new(&self.http_client, url, token)),
            _ => Err(ApiError::configuration("NocoDB API configuration is missing")),
        }
    }

    /// Hosting client, or a configuration error if its token or account is unset
    pub fn hosting(&self) -> Result<HostingClient<'_>> {
        let hosting = &self.config.hosting;
        match (present(&hosting.api_token), present(&hosting.account_id)) {
            (Some(token), Some(account)) => Ok(HostingClient::new(
                &self.http_client,
                &hosting.api_base_url,
                token,
                account,
            )),
            _ => Err(ApiError::configuration(
                "Missing Cloudflare API credentials in environment variables",
            )),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Create the outbound HTTP client
fn create_http_client(config: &Config) -> Result<Client> {
    let mut builder = Client::builder()
        .connect_timeout(Duration::from_secs(config.http.connect_timeout_seconds))
        .user_agent(format!("directory-api-gateway/{}", env!("CARGO_PKG_VERSION")));

    if let Some(seconds) = config.http.request_timeout_seconds {
        builder = builder.timeout(Duration::from_secs(seconds));
    }

    builder.build().map_err(ApiError::HttpClient)
}
