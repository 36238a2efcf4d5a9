//! PheWAS Catalog
//!
//! `Phewas_Catalog.txt`, 10 tab-separated columns:
//! chromosome, snp, phewas phenotype, cases, p-value, odds-ratio,
//! gene_name, phewas code, gwas-associations, EFO identifier (or `N/A`).

use super::{match_line, required_f64, required_u64, scan, LineRecord, LineSchema};
use crate::config::GwasConfig;
use crate::efo::EfoLookup;
use crate::model::{GwasAssociation, SampleSize};
use crate::source::{GwasSource, SourceError, SourceQuery};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Every row comes from the one PheWAS Catalog publication.
const PUBLICATION: &str = "PMID24270849";

pub struct PhewasCatalog {
    path: PathBuf,
    efo: Arc<dyn EfoLookup>,
}

impl PhewasCatalog {
    pub const DISPLAY_NAME: &'static str = "Phewas Catalog";
    pub const FILE_NAME: &'static str = "Phewas_Catalog.txt";

    pub fn new(path: impl Into<PathBuf>, efo: Arc<dyn EfoLookup>) -> Self {
        Self {
            path: path.into(),
            efo,
        }
    }

    pub fn from_config(config: &GwasConfig, efo: Arc<dyn EfoLookup>) -> Self {
        Self::new(config.database_file(Self::FILE_NAME), efo)
    }
}

impl LineSchema for PhewasCatalog {
    fn display_name(&self) -> &str {
        Self::DISPLAY_NAME
    }

    fn columns(&self) -> usize {
        10
    }

    fn parse<'a>(&self, fields: &[&'a str], query: &SourceQuery) -> Option<LineRecord<'a>> {
        let phenotype = fields[2];
        let matched = match_line(fields[9], phenotype, query)?;

        let cases = required_u64(fields[3]).ok()?;
        let pvalue = required_f64(fields[4]).ok()?;
        let odds_ratio = required_f64(fields[5]).ok()?;

        let record = GwasAssociation::new(fields[1].trim(), pvalue, Self::DISPLAY_NAME, PUBLICATION)
            .with_reported_trait(phenotype)
            .with_sample_size(SampleSize::Known(cases))
            .with_odds_ratio(Some(odds_ratio));

        Some(LineRecord { matched, record })
    }
}

#[async_trait]
impl GwasSource for PhewasCatalog {
    fn display_name(&self) -> &str {
        Self::DISPLAY_NAME
    }

    async fn run(&self, query: &SourceQuery) -> Result<Vec<GwasAssociation>, SourceError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        scan(self, &self.path, query, self.efo.as_ref()).await
    }
}
