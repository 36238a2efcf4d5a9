//! reqwest-backed fetcher

use super::{join_url, FetchError, JsonFetcher};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

/// Issues plain GET requests and decodes the body as JSON.
///
/// Non-2xx responses are errors.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn get(&self, server: &str, path: &str) -> Result<Value, FetchError> {
        let url = join_url(server, path);
        tracing::debug!(%url, "GET");

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }
}
