//! In-memory fetcher for tests and offline runs

use super::{join_url, FetchError, JsonFetcher};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Returns preconfigured documents keyed by full URL.
///
/// Unregistered URLs fail with `FetchError::NotFound`. Every request is
/// recorded so tests can assert on what was (or was not) fetched.
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, Option<Value>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document for a URL.
    pub fn with_response(mut self, url: impl Into<String>, body: Value) -> Self {
        self.responses.insert(url.into(), Some(body));
        self
    }

    /// Register a URL that fails as a transport error would.
    pub fn with_failure(mut self, url: impl Into<String>) -> Self {
        self.responses.insert(url.into(), None);
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl JsonFetcher for MockFetcher {
    async fn get(&self, server: &str, path: &str) -> Result<Value, FetchError> {
        let url = join_url(server, path);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.clone());
        }

        match self.responses.get(&url) {
            Some(Some(body)) => Ok(body.clone()),
            Some(None) => Err(FetchError::NotFound(format!("mock failure for {}", url))),
            None => Err(FetchError::NotFound(format!("no mock response for {}", url))),
        }
    }
}
