use std::time::Duration;

use reqwest::Client;

use crate::error::{CalendarError, Result};

/// Thin client for the local cockpit item API.
#[derive(Clone)]
pub struct CockpitClient {
    client: Client,
    base_url: String,
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

impl CockpitClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Requests that take longer than `timeout` fail with `CalendarError::Http`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/today`, returning the raw schedule text.
    pub async fn today(&self) -> Result<String> {
        let resp = self
            .client
            .get(format!("{}/api/today", self.base_url))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(CalendarError::Api { status, message });
        }

        Ok(resp.text().await?)
    }
}
