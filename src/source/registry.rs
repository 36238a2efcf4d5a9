//! Source registry — selects sources by display name and runs them
//!
//! Sources are registered once, deduplicated by display name, and kept in
//! registration order. Selection compares names with underscores read as
//! spaces, so `GWAS_Catalog` on a command line selects "GWAS Catalog".
//! One source failing does not stop the others.

use super::traits::{GwasSource, SourceError, SourceQuery};
use crate::catalog::GwasCatalog;
use crate::config::GwasConfig;
use crate::efo::EfoLookup;
use crate::flatfile::{Grasp, GwasDb, NealeUkb, PhewasCatalog, SummaryStatsFile};
use crate::model::GwasAssociation;
use crate::orientation::{EnsemblReference, OrientationResolver};
use crate::rest::JsonFetcher;
use std::sync::Arc;

/// Outcome of running a set of sources.
#[derive(Debug, Default)]
pub struct GatherResult {
    /// Records from every source that succeeded, in source order
    pub associations: Vec<GwasAssociation>,
    /// How many sources were run
    pub sources_invoked: usize,
    /// Errors from individual sources (display_name, error)
    pub errors: Vec<(String, SourceError)>,
}

impl GatherResult {
    /// True if any source reported a data-consistency violation.
    pub fn has_fatal(&self) -> bool {
        self.errors.iter().any(|(_, e)| e.is_fatal())
    }
}

/// Selection names treat `_` and ` ` alike.
fn normalize(name: &str) -> String {
    name.trim().replace('_', " ")
}

pub struct SourceRegistry {
    sources: Vec<Arc<dyn GwasSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Every built-in source, wired from `config`.
    ///
    /// Network access goes through `fetcher`; flat-file EFO identifiers are
    /// named through `efo`.
    pub fn with_defaults(
        config: &GwasConfig,
        fetcher: Arc<dyn JsonFetcher>,
        efo: Arc<dyn EfoLookup>,
    ) -> Self {
        let reference = EnsemblReference::new(fetcher.clone(), config.ensembl_server.clone());
        let resolver = OrientationResolver::new(Arc::new(reference));

        let mut registry = Self::new();
        registry.register(Arc::new(GwasCatalog::new(
            fetcher,
            config.catalog_server.clone(),
            resolver,
        )));
        registry.register(Arc::new(NealeUkb::from_config(config)));
        registry.register(Arc::new(Grasp::from_config(config, efo.clone())));
        registry.register(Arc::new(PhewasCatalog::from_config(config, efo.clone())));
        registry.register(Arc::new(SummaryStatsFile::from_config(config)));
        registry.register(Arc::new(GwasDb::from_config(config, efo)));
        registry
    }

    /// Add a source. A second source with the same display name is ignored.
    pub fn register(&mut self, source: Arc<dyn GwasSource>) -> bool {
        let name = source.display_name();
        if self.get(name).is_some() {
            tracing::warn!(source = name, "source already registered");
            return false;
        }
        self.sources.push(source);
        true
    }

    pub fn display_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.display_name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn GwasSource>> {
        let wanted = normalize(name);
        self.sources
            .iter()
            .find(|s| normalize(s.display_name()) == wanted)
    }

    /// Sources whose display name is in `names`, in registration order.
    ///
    /// An empty `names` selects everything. Names that match nothing are
    /// logged and otherwise ignored.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Vec<Arc<dyn GwasSource>> {
        if names.is_empty() {
            return self.sources.clone();
        }

        let wanted: Vec<String> = names.iter().map(|n| normalize(n.as_ref())).collect();
        for (raw, name) in names.iter().zip(&wanted) {
            if !self.sources.iter().any(|s| normalize(s.display_name()) == *name) {
                tracing::warn!(source = raw.as_ref(), "no source with this name");
            }
        }

        self.sources
            .iter()
            .filter(|s| wanted.contains(&normalize(s.display_name())))
            .cloned()
            .collect()
    }

    /// Run the selected sources one after another and pool their records.
    pub async fn gather<S: AsRef<str>>(&self, names: &[S], query: &SourceQuery) -> GatherResult {
        let mut result = GatherResult::default();

        for source in self.select(names) {
            let name = source.display_name().to_string();
            result.sources_invoked += 1;
            tracing::debug!(source = %name, "running source");

            match source.run(query).await {
                Ok(records) => result.associations.extend(records),
                Err(e) => {
                    tracing::error!(source = %name, error = %e, "source failed");
                    result.errors.push((name, e));
                }
            }
        }

        tracing::info!(
            "Found {} GWAS associations from {} sources",
            result.associations.len(),
            result.sources_invoked
        );
        result
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
