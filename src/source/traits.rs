//! GwasSource trait — the contract every evidence source implements
//!
//! A source takes the requested diseases and ontology IRIs and returns the
//! associations it holds for them. Malformed items are dropped inside the
//! source; only whole-source failures surface as `SourceError`.

use crate::model::GwasAssociation;
use crate::rest::FetchError;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

/// What a caller asks every source for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceQuery {
    /// Free-text trait descriptions
    pub diseases: BTreeSet<String>,
    /// Trait ontology (EFO) IRIs
    pub iris: BTreeSet<String>,
}

impl SourceQuery {
    pub fn new<D, I>(diseases: D, iris: I) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            diseases: diseases.into_iter().map(Into::into).collect(),
            iris: iris.into_iter().map(Into::into).collect(),
        }
    }

    /// True if neither diseases nor IRIs were requested.
    pub fn is_empty(&self) -> bool {
        self.diseases.is_empty() && self.iris.is_empty()
    }

    pub fn has_disease(&self, name: &str) -> bool {
        self.diseases.contains(name)
    }

    pub fn has_iri(&self, iri: &str) -> bool {
        self.iris.contains(iri)
    }

    /// `diseases (a, b) or EFO IDs (x)`, for log lines.
    pub fn describe(&self) -> String {
        let join = |set: &BTreeSet<String>| set.iter().cloned().collect::<Vec<_>>().join(", ");
        format!(
            "diseases ({}) or EFO IDs ({})",
            join(&self.diseases),
            join(&self.iris)
        )
    }
}

/// Errors that stop a whole source (not individual records).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error reading {path}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("more than one association for {snp} in {path}")]
    DuplicateSnp { snp: String, path: PathBuf },
}

impl SourceError {
    /// Data-consistency violations the caller must not paper over.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DuplicateSnp { .. })
    }
}

/// The contract evidence sources implement.
///
/// If `query.iris` is non-empty, sources with ontology support use the IRIs
/// in preference to the disease names. A query with neither returns an empty
/// list without touching the network or the filesystem.
#[async_trait]
pub trait GwasSource: Send + Sync {
    /// Stable name used for selection and provenance (`record.source`)
    fn display_name(&self) -> &str;

    async fn run(&self, query: &SourceQuery) -> Result<Vec<GwasAssociation>, SourceError>;
}
