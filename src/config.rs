//! Run configuration
//!
//! Everything a source needs from its environment is passed in through
//! [`GwasConfig`] at construction; there is no process-wide state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Default p-value cutoff for bulk summary-statistics ingestion.
pub const DEFAULT_PVALUE_CUTOFF: f64 = 1e-4;

/// Study annotation applied to every summary-statistics record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryStatsStudy {
    /// Used as source tag, reported trait, study and disease name
    pub label: String,
    pub publication: String,
    pub sample_size: Option<u64>,
}

impl Default for SummaryStatsStudy {
    fn default() -> Self {
        Self {
            label: "Manual".to_string(),
            publication: "PMID000".to_string(),
            sample_size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GwasConfig {
    /// Directory holding GRASP.txt, Phewas_Catalog.txt, GWAS_DB.txt, Neale_UKB.txt
    pub databases_dir: PathBuf,
    /// Generic summary-statistics file; the "GWAS File" source is empty without it
    pub summary_stats_file: Option<PathBuf>,
    /// Rows at or above this p-value are dropped in bulk ingestion
    pub pvalue_cutoff: f64,
    /// Display names of the sources to run; empty runs all of them
    pub sources: Vec<String>,
    pub catalog_server: String,
    pub ensembl_server: String,
    pub ols_server: String,
    pub summary_stats_study: SummaryStatsStudy,
}

impl Default for GwasConfig {
    fn default() -> Self {
        Self {
            databases_dir: default_databases_dir(),
            summary_stats_file: None,
            pvalue_cutoff: DEFAULT_PVALUE_CUTOFF,
            sources: Vec::new(),
            catalog_server: "https://www.ebi.ac.uk".to_string(),
            ensembl_server: "https://rest.ensembl.org".to_string(),
            ols_server: "https://www.ebi.ac.uk/ols".to_string(),
            summary_stats_study: SummaryStatsStudy::default(),
        }
    }
}

impl GwasConfig {
    /// Load a YAML configuration file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Path of a flat-file database inside `databases_dir`.
    pub fn database_file(&self, file_name: &str) -> PathBuf {
        self.databases_dir.join(file_name)
    }
}

/// Default databases directory (~/.local/share/gwas-sources/databases)
fn default_databases_dir() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("gwas-sources").join("databases")
}
