//! EFO term lookup — resolves ontology IRIs to trait names
//!
//! Flat-file sources only carry EFO identifiers; the display name comes
//! from the ontology lookup service.

use crate::model::Disease;
use crate::rest::{embedded, FetchError, JsonFetcher};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves an ontology IRI to its preferred label.
#[async_trait]
pub trait EfoLookup: Send + Sync {
    async fn term(&self, iri: &str) -> Result<String, FetchError>;
}

/// Lookup against the EBI Ontology Lookup Service.
pub struct OlsTermLookup {
    fetcher: Arc<dyn JsonFetcher>,
    server: String,
}

impl OlsTermLookup {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, server: impl Into<String>) -> Self {
        Self {
            fetcher,
            server: server.into(),
        }
    }
}

#[async_trait]
impl EfoLookup for OlsTermLookup {
    async fn term(&self, iri: &str) -> Result<String, FetchError> {
        let path = format!("/api/ontologies/efo/terms?iri={}", urlencoding::encode(iri));
        let document = self.fetcher.get(&self.server, &path).await?;

        embedded(&document, "terms")
            .first()
            .and_then(|t| t.get("label"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| FetchError::MissingField(format!("label for {}", iri)))
    }
}

/// Fixed IRI → label table, for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticTerms {
    terms: HashMap<String, String>,
}

impl StaticTerms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term(mut self, iri: impl Into<String>, label: impl Into<String>) -> Self {
        self.terms.insert(iri.into(), label.into());
        self
    }
}

#[async_trait]
impl EfoLookup for StaticTerms {
    async fn term(&self, iri: &str) -> Result<String, FetchError> {
        self.terms
            .get(iri)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(format!("no term for {}", iri)))
    }
}

/// Memoizes lookups for the duration of one source run.
///
/// Failed lookups are remembered too, so a bad IRI is only queried once.
pub(crate) struct TermCache<'a> {
    lookup: &'a dyn EfoLookup,
    resolved: HashMap<String, Option<String>>,
}

impl<'a> TermCache<'a> {
    pub(crate) fn new(lookup: &'a dyn EfoLookup) -> Self {
        Self {
            lookup,
            resolved: HashMap::new(),
        }
    }

    /// Build the disease for an IRI, or `None` if the term cannot be found.
    pub(crate) async fn disease(&mut self, iri: &str) -> Option<Disease> {
        if let Some(cached) = self.resolved.get(iri) {
            return cached.clone().map(|name| Disease::new(name, iri));
        }

        let name = match self.lookup.term(iri).await {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::warn!(%iri, error = %e, "EFO term lookup failed");
                None
            }
        };
        self.resolved.insert(iri.to_string(), name.clone());
        name.map(|name| Disease::new(name, iri))
    }
}
