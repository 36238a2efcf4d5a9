//! GWASdb
//!
//! `GWAS_DB.txt`, 7 tab-separated columns:
//! CHR, POS, SNPID, P_VALUE, PUBMED ID, MESH_TERM, EFO_ID.
//! The file carries no sample sizes.

use super::{match_line, required_f64, scan, LineRecord, LineSchema};
use crate::config::GwasConfig;
use crate::efo::EfoLookup;
use crate::model::{pubmed_citation, GwasAssociation, SampleSize};
use crate::source::{GwasSource, SourceError, SourceQuery};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

pub struct GwasDb {
    path: PathBuf,
    efo: Arc<dyn EfoLookup>,
}

impl GwasDb {
    pub const DISPLAY_NAME: &'static str = "GWAS DB";
    pub const FILE_NAME: &'static str = "GWAS_DB.txt";

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

impl LineSchema for GwasDb {
    fn display_name(&self) -> &str {
        Self::DISPLAY_NAME
    }

    fn columns(&self) -> usize {
        7
    }

    fn parse<'a>(&self, fields: &[&'a str], query: &SourceQuery) -> Option<LineRecord<'a>> {
        let mesh_term = fields[5];
        let matched = match_line(fields[6], mesh_term, query)?;
        let pvalue = required_f64(fields[3]).ok()?;

        let record = GwasAssociation::new(
            fields[2].trim(),
            pvalue,
            Self::DISPLAY_NAME,
            pubmed_citation(fields[4]),
        )
        .with_reported_trait(mesh_term)
        .with_sample_size(SampleSize::Unknown);

        Some(LineRecord { matched, record })
    }
}

#[async_trait]
impl GwasSource for GwasDb {
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
