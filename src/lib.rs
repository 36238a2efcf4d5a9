//! gwas-sources: GWAS association evidence from heterogeneous sources
//!
//! Collects SNP–trait associations for a set of diseases or EFO ontology
//! IRIs from a REST catalog and several flat-file databases, and normalizes
//! them into one record shape.
//!
//! # Core Concepts
//!
//! - **Sources**: implementations of [`GwasSource`], each selected by display name
//! - **Associations**: normalized [`GwasAssociation`] records tagged with their source
//! - **Orientation**: whether a reported risk allele is the reference base
//!
//! # Example
//!
//! ```no_run
//! use gwas_sources::{GwasConfig, HttpFetcher, OlsTermLookup, SourceQuery, SourceRegistry};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GwasConfig::default();
//! let fetcher = Arc::new(HttpFetcher::new()?);
//! let efo = Arc::new(OlsTermLookup::new(fetcher.clone(), config.ols_server.clone()));
//! let registry = SourceRegistry::with_defaults(&config, fetcher, efo);
//!
//! let query = SourceQuery::new(vec!["asthma"], Vec::<String>::new());
//! let result = registry.gather(&["GRASP", "GWAS_Catalog"], &query).await;
//! println!("{} associations", result.associations.len());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod efo;
pub mod flatfile;
mod model;
pub mod orientation;
pub mod rest;
pub mod source;

pub use catalog::GwasCatalog;
pub use config::{ConfigError, GwasConfig, SummaryStatsStudy, DEFAULT_PVALUE_CUTOFF};
pub use efo::{EfoLookup, OlsTermLookup, StaticTerms};
pub use flatfile::{Grasp, GwasDb, NealeUkb, PhewasCatalog, SnpLookup, SummaryStatsFile};
pub use model::{Disease, GwasAssociation, SampleSize};
pub use orientation::{AlleleOrientation, EnsemblReference, OrientationResolver, ReferenceGenome};
pub use rest::{FetchError, HttpFetcher, JsonFetcher, MockFetcher};
pub use source::{GatherResult, GwasSource, SourceError, SourceQuery, SourceRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
