//! JSON-over-HTTP collaborators
//!
//! Defines the fetch trait every REST-backed component is written against.
//! Two implementations:
//! - `HttpFetcher`: reqwest client issuing GETs (production)
//! - `MockFetcher`: returns preconfigured documents keyed by URL (testing)
//!
//! There is no retry layer here. Callers treat a failed fetch of a
//! sub-resource as "no data for this item".

mod hal;
mod http;
mod mock;

pub use hal::{embedded, link_href};
pub use http::HttpFetcher;
pub use mock::MockFetcher;

use async_trait::async_trait;
use serde_json::Value;

/// Errors from fetching or decoding a JSON resource.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("resource not found: {0}")]
    NotFound(String),
}

/// Fetches a JSON document.
///
/// `server` is either a base URL (with `path` appended) or a full URL taken
/// from a hypermedia link (with an empty `path`).
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn get(&self, server: &str, path: &str) -> Result<Value, FetchError>;
}

/// Join a server and a path the way every fetcher does.
pub(crate) fn join_url(server: &str, path: &str) -> String {
    if path.is_empty() {
        return server.to_string();
    }
    format!(
        "{}/{}",
        server.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
