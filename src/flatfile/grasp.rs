//! GRASP — Genome-Wide Repository of Associations Between SNPs and Phenotypes
//!
//! `GRASP.txt`, 71 tab-separated columns. The ones read here (1-based):
//!
//! | col | field |
//! |-----|-------|
//! | 5   | SNPid(dbSNP134), digits only |
//! | 8   | PMID |
//! | 11  | Pvalue |
//! | 13  | PaperPhenotypeDescription |
//! | 25  | TotalSamples(discovery+replication) |
//! | 71  | EFO string, comma-separated |

use super::{match_line, required_f64, required_u64, scan, LineRecord, LineSchema};
use crate::config::GwasConfig;
use crate::efo::EfoLookup;
use crate::model::{pubmed_citation, GwasAssociation, SampleSize};
use crate::source::{GwasSource, SourceError, SourceQuery};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

const SNP: usize = 4;
const PMID: usize = 7;
const PVALUE: usize = 10;
const PHENOTYPE: usize = 12;
const TOTAL_SAMPLES: usize = 24;
const EFO: usize = 70;

pub struct Grasp {
    path: PathBuf,
    efo: Arc<dyn EfoLookup>,
}

impl Grasp {
    pub const DISPLAY_NAME: &'static str = "GRASP";
    pub const FILE_NAME: &'static str = "GRASP.txt";

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

impl LineSchema for Grasp {
    fn display_name(&self) -> &str {
        Self::DISPLAY_NAME
    }

    fn columns(&self) -> usize {
        EFO + 1
    }

    fn parse<'a>(&self, fields: &[&'a str], query: &SourceQuery) -> Option<LineRecord<'a>> {
        let phenotype = fields[PHENOTYPE];
        let matched = match_line(fields[EFO], phenotype, query)?;

        let pvalue = required_f64(fields[PVALUE]).ok()?;
        let sample_size = required_u64(fields[TOTAL_SAMPLES]).ok()?;

        let record = GwasAssociation::new(
            format!("rs{}", fields[SNP].trim()),
            pvalue,
            Self::DISPLAY_NAME,
            pubmed_citation(fields[PMID]),
        )
        .with_reported_trait(phenotype)
        .with_sample_size(SampleSize::Known(sample_size));

        Some(LineRecord { matched, record })
    }
}

#[async_trait]
impl GwasSource for Grasp {
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
