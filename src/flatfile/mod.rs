//! Flat-file GWAS databases
//!
//! Each database is a tab-separated file with its own fixed column layout.
//! Every line is parsed on its own into zero or one association; lines that
//! are short, carry unparsable numbers, or match nothing requested are
//! dropped without failing the source.
//!
//! Matching is shared by every ontology-aware layout: a line is taken if any
//! of its EFO identifiers was requested (the first such identifier names the
//! disease), otherwise if its trait text equals a requested disease name.
//! The two strategies never both apply to one line.

mod gwas_db;
mod grasp;
mod neale_ukb;
mod phewas;
mod summary_stats;

pub use gwas_db::GwasDb;
pub use grasp::Grasp;
pub use neale_ukb::NealeUkb;
pub use phewas::PhewasCatalog;
pub use summary_stats::{SnpLookup, SummaryStatsFile, SummaryStatsHeader};

use crate::efo::{EfoLookup, TermCache};
use crate::model::{Disease, GwasAssociation};
use crate::source::{SourceError, SourceQuery};
use std::num::{ParseFloatError, ParseIntError};
use std::path::Path;

/// Ontology id recorded when a line matched by name carries no identifier.
pub const UNMAPPED_EFO: &str = "N/A";

/// Read a whole file as decoded lines.
///
/// Lines that are not valid UTF-8 are decoded as Latin-1, which older
/// database dumps use for author and trait text.
pub(crate) async fn read_lines(path: &Path) -> Result<Vec<String>, SourceError> {
    let bytes = tokio::fs::read(path).await.map_err(|error| SourceError::Io {
        path: path.to_path_buf(),
        error,
    })?;

    Ok(bytes
        .split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(decode_line)
        .collect())
}

pub(crate) fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

pub(crate) fn split_fields(line: &str) -> Vec<&str> {
    line.split('\t').collect()
}

/// Comma-separated ontology identifiers, skipping blanks and `N/A`.
pub(crate) fn iri_values(field: &str) -> impl Iterator<Item = &str> {
    field
        .split(',')
        .map(str::trim)
        .filter(|iri| !iri.is_empty() && *iri != UNMAPPED_EFO)
}

/// How a line was selected by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TraitMatch<'a> {
    /// One of the line's identifiers was requested
    Iri(&'a str),
    /// The trait text was requested; carries the line's first identifier
    Name(Option<&'a str>),
    /// The source has no ontology column; no disease is attached
    Untagged,
}

/// Apply the shared iri-then-name policy to one line.
pub(crate) fn match_line<'a>(
    iri_field: &'a str,
    trait_text: &str,
    query: &SourceQuery,
) -> Option<TraitMatch<'a>> {
    if let Some(iri) = iri_values(iri_field).find(|iri| query.has_iri(iri)) {
        return Some(TraitMatch::Iri(iri));
    }
    if query.has_disease(trait_text) {
        return Some(TraitMatch::Name(iri_values(iri_field).next()));
    }
    None
}

/// A parsed line, still missing its disease.
#[derive(Debug)]
pub(crate) struct LineRecord<'a> {
    pub matched: TraitMatch<'a>,
    pub record: GwasAssociation,
}

/// A fixed-column layout.
pub(crate) trait LineSchema: Send + Sync {
    fn display_name(&self) -> &str;

    /// Minimum number of tab-separated fields a usable line has
    fn columns(&self) -> usize;

    /// Parse one line; `None` drops it.
    fn parse<'a>(&self, fields: &[&'a str], query: &SourceQuery) -> Option<LineRecord<'a>>;
}

/// Read `path` and run every line through `schema`.
pub(crate) async fn scan<S: LineSchema>(
    schema: &S,
    path: &Path,
    query: &SourceQuery,
    efo: &dyn EfoLookup,
) -> Result<Vec<GwasAssociation>, SourceError> {
    let lines = read_lines(path).await?;
    let mut terms = TermCache::new(efo);
    let mut found = Vec::new();
    let mut skipped = 0usize;

    for line in &lines {
        let fields = split_fields(line);
        if fields.len() < schema.columns() {
            skipped += 1;
            continue;
        }
        let Some(LineRecord { matched, record }) = schema.parse(&fields, query) else {
            continue;
        };

        let disease = match matched {
            TraitMatch::Iri(iri) | TraitMatch::Name(Some(iri)) => match terms.disease(iri).await {
                Some(disease) => Some(disease),
                None => {
                    skipped += 1;
                    continue;
                }
            },
            TraitMatch::Name(None) => Some(Disease::new(record.reported_trait.clone(), UNMAPPED_EFO)),
            TraitMatch::Untagged => None,
        };

        match record.with_disease(disease).checked() {
            Some(record) => found.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(source = schema.display_name(), skipped, "skipped unusable lines");
    }
    tracing::info!(
        "Found {} GWAS SNPs associated to {} in {}",
        found.len(),
        query.describe(),
        schema.display_name()
    );

    Ok(found)
}

pub(crate) fn required_f64(field: &str) -> Result<f64, ParseFloatError> {
    field.trim().parse()
}

pub(crate) fn required_u64(field: &str) -> Result<u64, ParseIntError> {
    field.trim().parse()
}

/// Blank and `NA`-style markers are `None`; anything else must parse.
pub(crate) fn optional_f64(field: &str) -> Result<Option<f64>, ParseFloatError> {
    match field.trim() {
        "" | "NA" | "N/A" | "NR" | "-" => Ok(None),
        value => value.parse().map(Some),
    }
}
