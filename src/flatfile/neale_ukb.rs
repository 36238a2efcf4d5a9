//! Neale lab UK Biobank summary associations
//!
//! `Neale_UKB.txt`, 10 tab-separated columns:
//! snp, disease, reported_trait, p_value, sample_size, source, study,
//! odds_ratio, beta_coefficient, beta_coefficient_direction.
//!
//! The file has no ontology mapping, so it is only ever filtered by trait
//! name and never scanned for an IRI-only query.

use super::{optional_f64, required_f64, scan, LineRecord, LineSchema, TraitMatch};
use crate::config::GwasConfig;
use crate::efo::StaticTerms;
use crate::model::{GwasAssociation, SampleSize};
use crate::source::{GwasSource, SourceError, SourceQuery};
use async_trait::async_trait;
use std::path::PathBuf;

/// Provenance tag on every record; differs from the selection name.
const SOURCE_TAG: &str = "UK Biobank";

pub struct NealeUkb {
    path: PathBuf,
}

impl NealeUkb {
    pub const DISPLAY_NAME: &'static str = "Neale_UKB";
    pub const FILE_NAME: &'static str = "Neale_UKB.txt";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &GwasConfig) -> Self {
        Self::new(config.database_file(Self::FILE_NAME))
    }
}

/// Sample sizes are sometimes written as `337199.0`.
fn sample_count(field: &str) -> Option<u64> {
    let field = field.trim();
    if let Ok(n) = field.parse::<u64>() {
        return Some(n);
    }
    let n = field.parse::<f64>().ok()?;
    (n.is_finite() && n >= 0.0 && n.fract() == 0.0).then_some(n as u64)
}

fn optional_text(field: &str) -> Option<String> {
    match field.trim() {
        "" | "NA" | "N/A" => None,
        text => Some(text.to_string()),
    }
}

impl LineSchema for NealeUkb {
    fn display_name(&self) -> &str {
        Self::DISPLAY_NAME
    }

    fn columns(&self) -> usize {
        10
    }

    fn parse<'a>(&self, fields: &[&'a str], query: &SourceQuery) -> Option<LineRecord<'a>> {
        let reported_trait = fields[2];
        if !query.has_disease(reported_trait) {
            return None;
        }

        let pvalue = required_f64(fields[3]).ok()?;
        let sample_size = sample_count(fields[4])?;
        let odds_ratio = optional_f64(fields[7]).ok()?;
        let beta = optional_f64(fields[8]).ok()?;

        let record = GwasAssociation::new(fields[0].trim(), pvalue, SOURCE_TAG, fields[5].trim())
            .with_reported_trait(format!("{} {}", reported_trait, fields[1]))
            .with_sample_size(SampleSize::Known(sample_size))
            .with_study(optional_text(fields[6]))
            .with_odds_ratio(odds_ratio)
            .with_beta(beta, None, optional_text(fields[9]));

        Some(LineRecord {
            matched: TraitMatch::Untagged,
            record,
        })
    }
}

#[async_trait]
impl GwasSource for NealeUkb {
    fn display_name(&self) -> &str {
        Self::DISPLAY_NAME
    }

    async fn run(&self, query: &SourceQuery) -> Result<Vec<GwasAssociation>, SourceError> {
        if query.diseases.is_empty() {
            return Ok(Vec::new());
        }
        // untagged lines never consult the term lookup
        scan(self, &self.path, query, &StaticTerms::new()).await
    }
}
