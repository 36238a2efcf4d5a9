//! GwasAssociation — one reported association between a SNP and a trait
//!
//! Every source produces this shape. Records are built once by a source's
//! parsing step and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// A trait name paired with its ontology identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disease {
    pub name: String,
    /// EFO IRI or short form, `N/A` when the source line carried none
    pub efo: String,
}

impl Disease {
    pub fn new(name: impl Into<String>, efo: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            efo: efo.into(),
        }
    }
}

/// Number of individuals behind an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleSize {
    Known(u64),
    Unknown,
}

impl SampleSize {
    pub fn known(&self) -> Option<u64> {
        match self {
            Self::Known(n) => Some(*n),
            Self::Unknown => None,
        }
    }
}

impl Default for SampleSize {
    fn default() -> Self {
        Self::Unknown
    }
}

/// A single normalized GWAS association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GwasAssociation {
    /// dbSNP identifier (`rs` + digits)
    pub snp: String,
    pub disease: Option<Disease>,
    /// Free-text trait as given by the source
    pub reported_trait: String,
    pub pvalue: f64,
    pub pvalue_description: Option<String>,
    pub sample_size: SampleSize,
    pub odds_ratio: Option<f64>,
    pub odds_ratio_ci_start: Option<f64>,
    pub odds_ratio_ci_end: Option<f64>,
    pub beta_coefficient: Option<f64>,
    pub beta_coefficient_unit: Option<String>,
    pub beta_coefficient_direction: Option<String>,
    /// Display name of the originating source
    pub source: String,
    /// Citation, usually `PMID<id>`
    pub publication: String,
    pub study: Option<String>,
    /// `None` when orientation was not resolved
    pub risk_alleles_present_in_reference: Option<bool>,
    /// Raw catalog SNP object, kept for later enrichment
    pub rest_hash: Option<serde_json::Value>,
}

impl GwasAssociation {
    pub fn new(
        snp: impl Into<String>,
        pvalue: f64,
        source: impl Into<String>,
        publication: impl Into<String>,
    ) -> Self {
        Self {
            snp: snp.into(),
            disease: None,
            reported_trait: String::new(),
            pvalue,
            pvalue_description: None,
            sample_size: SampleSize::Unknown,
            odds_ratio: None,
            odds_ratio_ci_start: None,
            odds_ratio_ci_end: None,
            beta_coefficient: None,
            beta_coefficient_unit: None,
            beta_coefficient_direction: None,
            source: source.into(),
            publication: publication.into(),
            study: None,
            risk_alleles_present_in_reference: None,
            rest_hash: None,
        }
    }

    pub fn with_disease(mut self, disease: Option<Disease>) -> Self {
        self.disease = disease;
        self
    }

    pub fn with_reported_trait(mut self, reported_trait: impl Into<String>) -> Self {
        self.reported_trait = reported_trait.into();
        self
    }

    pub fn with_pvalue_description(mut self, description: Option<String>) -> Self {
        self.pvalue_description = description;
        self
    }

    pub fn with_sample_size(mut self, sample_size: SampleSize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_odds_ratio(mut self, odds_ratio: Option<f64>) -> Self {
        self.odds_ratio = odds_ratio;
        self
    }

    pub fn with_confidence_interval(mut self, bounds: Option<(f64, f64)>) -> Self {
        self.odds_ratio_ci_start = bounds.map(|(start, _)| start);
        self.odds_ratio_ci_end = bounds.map(|(_, end)| end);
        self
    }

    pub fn with_beta(
        mut self,
        coefficient: Option<f64>,
        unit: Option<String>,
        direction: Option<String>,
    ) -> Self {
        self.beta_coefficient = coefficient;
        self.beta_coefficient_unit = unit;
        self.beta_coefficient_direction = direction;
        self
    }

    pub fn with_study(mut self, study: Option<String>) -> Self {
        self.study = study;
        self
    }

    pub fn with_risk_alleles_present(mut self, present: Option<bool>) -> Self {
        self.risk_alleles_present_in_reference = present;
        self
    }

    pub fn with_rest_hash(mut self, rest_hash: serde_json::Value) -> Self {
        self.rest_hash = Some(rest_hash);
        self
    }

    /// True if the record carries a SNP identifier and a finite p-value.
    pub fn is_valid(&self) -> bool {
        !self.snp.trim().is_empty() && self.pvalue.is_finite()
    }

    /// Pass the record through only if it is valid.
    ///
    /// Every source funnels its output through here, so no record without a
    /// SNP or with a NaN/infinite p-value ever leaves a source.
    pub fn checked(self) -> Option<Self> {
        if self.is_valid() {
            Some(self)
        } else {
            tracing::debug!(snp = %self.snp, pvalue = self.pvalue, "discarding invalid association");
            None
        }
    }
}

/// Prefix a bare numeric PubMed id with `PMID`.
pub(crate) fn pubmed_citation(raw: &str) -> String {
    let raw = raw.trim();
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        format!("PMID{}", raw)
    } else {
        raw.to_string()
    }
}
