//! Generic GWAS summary statistics ("GWAS File")
//!
//! Unlike the fixed-layout databases, this file describes itself: the first
//! line names the columns. `variant_id`, `p-value` and `beta` are required
//! and located once, when the header is read.
//!
//! Two uses share the same row parsing:
//! - [`GwasSource::run`] keeps every row under the configured p-value cutoff
//! - [`SummaryStatsFile::lookup`] fetches the rows for a given set of SNPs,
//!   and refuses to choose when a SNP appears twice

use super::{read_lines, required_f64, split_fields};
use crate::config::{GwasConfig, SummaryStatsStudy};
use crate::model::{Disease, GwasAssociation, SampleSize};
use crate::source::{GwasSource, SourceError, SourceQuery};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Column positions of the required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryStatsHeader {
    pub variant_id: usize,
    pub p_value: usize,
    pub beta: usize,
}

impl SummaryStatsHeader {
    pub const VARIANT_ID: &'static str = "variant_id";
    pub const P_VALUE: &'static str = "p-value";
    pub const BETA: &'static str = "beta";

    /// Locate the required columns, or name the first one missing.
    pub fn parse(line: &str) -> Result<Self, String> {
        let labels: Vec<&str> = line.split('\t').map(str::trim).collect();
        let index = |name: &str| {
            labels
                .iter()
                .position(|label| *label == name)
                .ok_or_else(|| name.to_string())
        };

        Ok(Self {
            variant_id: index(Self::VARIANT_ID)?,
            p_value: index(Self::P_VALUE)?,
            beta: index(Self::BETA)?,
        })
    }

    /// Fields a data line needs to cover every required column.
    fn width(&self) -> usize {
        self.variant_id.max(self.p_value).max(self.beta) + 1
    }
}

/// Required fields of one data line, still as text.
#[derive(Debug, Clone, Copy)]
struct SummaryRow<'a> {
    variant_id: &'a str,
    p_value: &'a str,
    beta: &'a str,
}

/// Result of a targeted SNP lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnpLookup {
    /// One record per SNP found, in file order
    pub found: Vec<GwasAssociation>,
    /// Requested SNPs with no row in the file, sorted
    pub missing: Vec<String>,
}

pub struct SummaryStatsFile {
    path: Option<PathBuf>,
    pvalue_cutoff: f64,
    study: SummaryStatsStudy,
}

impl SummaryStatsFile {
    pub const DISPLAY_NAME: &'static str = "GWAS File";

    pub fn new(path: Option<PathBuf>, pvalue_cutoff: f64, study: SummaryStatsStudy) -> Self {
        Self {
            path,
            pvalue_cutoff,
            study,
        }
    }

    pub fn from_config(config: &GwasConfig) -> Self {
        Self::new(
            config.summary_stats_file.clone(),
            config.pvalue_cutoff,
            config.summary_stats_study.clone(),
        )
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Records for exactly the wanted SNPs.
    ///
    /// Reads the whole file and returns at most one record per wanted SNP. A
    /// second row for a SNP already found is `SourceError::DuplicateSnp`, even
    /// when every other wanted SNP has been seen.
    pub async fn lookup(&self, wanted: &BTreeSet<String>) -> Result<SnpLookup, SourceError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(SnpLookup {
                found: Vec::new(),
                missing: wanted.iter().cloned().collect(),
            });
        };
        if wanted.is_empty() {
            return Ok(SnpLookup::default());
        }

        let mut found = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        self.for_each_row(path, |row| {
            if !wanted.contains(row.variant_id) {
                return Ok(());
            }
            let Some(record) = self.record(row) else {
                return Ok(());
            };
            if !seen.insert(record.snp.clone()) {
                tracing::error!(snp = %record.snp, path = %path.display(), "SNP matches more than one row");
                return Err(SourceError::DuplicateSnp {
                    snp: record.snp,
                    path: path.to_path_buf(),
                });
            }
            tracing::debug!(snp = %record.snp, "found in summary statistics");
            found.push(record);
            Ok(())
        })
        .await?;

        let missing: Vec<String> = wanted
            .iter()
            .filter(|snp| !seen.contains(*snp))
            .cloned()
            .collect();
        for snp in &missing {
            tracing::info!(%snp, "no matching association in summary statistics");
        }

        Ok(SnpLookup { found, missing })
    }

    /// Read the file, validate the header, and hand each usable row to `visit`.
    async fn for_each_row<F>(&self, path: &Path, mut visit: F) -> Result<(), SourceError>
    where
        F: FnMut(SummaryRow<'_>) -> Result<(), SourceError>,
    {
        let lines = read_lines(path).await?;
        let Some((header_line, data)) = lines.split_first() else {
            return Ok(());
        };
        let header =
            SummaryStatsHeader::parse(header_line).map_err(|column| SourceError::MissingColumn {
                path: path.to_path_buf(),
                column,
            })?;
        let width = header.width();

        for line in data {
            let fields = split_fields(line);
            if fields.len() < width {
                continue;
            }
            let row = SummaryRow {
                variant_id: fields[header.variant_id].trim(),
                p_value: fields[header.p_value],
                beta: fields[header.beta],
            };
            visit(row)?;
        }

        Ok(())
    }

    fn record(&self, row: SummaryRow<'_>) -> Option<GwasAssociation> {
        let pvalue = required_f64(row.p_value).ok()?;
        let beta = required_f64(row.beta).ok()?;
        let label = &self.study.label;
        let direction = if beta < 0.0 { "decrease" } else { "increase" };

        GwasAssociation::new(
            row.variant_id,
            pvalue,
            Self::DISPLAY_NAME,
            self.study.publication.as_str(),
        )
            .with_pvalue_description(Some(label.clone()))
            .with_disease(Some(Disease::new(label.as_str(), format!("EFO_{}", label))))
            .with_reported_trait(label.as_str())
            .with_study(Some(label.clone()))
            .with_sample_size(
                self.study
                    .sample_size
                    .map(SampleSize::Known)
                    .unwrap_or(SampleSize::Unknown),
            )
            .with_beta(Some(beta), None, Some(direction.to_string()))
            .checked()
    }
}

#[async_trait]
impl GwasSource for SummaryStatsFile {
    fn display_name(&self) -> &str {
        Self::DISPLAY_NAME
    }

    async fn run(&self, query: &SourceQuery) -> Result<Vec<GwasAssociation>, SourceError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(Vec::new());
        };
        if query.is_empty() {
            return Ok(Vec::new());
        }
        tracing::info!(path = %path.display(), "reading summary statistics");

        let mut found = Vec::new();
        self.for_each_row(path, |row| {
            let below_cutoff = required_f64(row.p_value)
                .map(|p| p < self.pvalue_cutoff)
                .unwrap_or(false);
            if below_cutoff {
                found.extend(self.record(row));
            }
            Ok(())
        })
        .await?;

        tracing::info!(
            "Found {} gwas associations with a pvalue of {} or less",
            found.len(),
            self.pvalue_cutoff
        );
        Ok(found)
    }
}
