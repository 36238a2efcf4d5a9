//! Gathers reference context and resolves risk-allele sets

use super::allele::{Base, RiskAlleleName};
use super::classify::{classify, SnpReference, VariantMapping};
use super::{combine, AlleleOrientation};
use crate::rest::FetchError;
use async_trait::async_trait;
use std::sync::Arc;

/// Reference-genome context for dbSNP variants.
#[async_trait]
pub trait ReferenceGenome: Send + Sync {
    /// All known mappings of a variant onto the assembly.
    async fn variant_mappings(&self, rsid: &str) -> Result<Vec<VariantMapping>, FetchError>;

    /// Forward-strand reference base covered by a single-base mapping.
    async fn reference_base(
        &self,
        mapping: &VariantMapping,
    ) -> Result<Option<Base>, FetchError>;
}

/// Resolves the strongest risk alleles of one locus.
#[derive(Clone)]
pub struct OrientationResolver {
    reference: Arc<dyn ReferenceGenome>,
}

impl OrientationResolver {
    pub fn new(reference: Arc<dyn ReferenceGenome>) -> Self {
        Self { reference }
    }

    /// Resolve a set of risk-allele names (`rs123-A`, ...) to one orientation.
    ///
    /// Stops at the first decisive failure without looking up the remaining
    /// candidates.
    pub async fn resolve(&self, risk_allele_names: &[String]) -> AlleleOrientation {
        let mut outcomes = Vec::with_capacity(risk_allele_names.len());

        for raw in risk_allele_names {
            let outcome = match RiskAlleleName::parse(raw) {
                Ok(name) if name.base().is_none() => AlleleOrientation::NoSubstitution,
                Ok(name) => {
                    let reference = self.snp_reference(&name.rsid).await;
                    classify(&name, &reference)
                }
                Err(failure) => failure,
            };

            if outcome.is_decisive_failure() {
                return outcome;
            }
            outcomes.push(outcome);
        }

        combine(outcomes)
    }

    async fn snp_reference(&self, rsid: &str) -> SnpReference {
        let mappings = match self.reference.variant_mappings(rsid).await {
            Ok(mappings) => mappings,
            Err(e) => {
                tracing::warn!(%rsid, error = %e, "variant lookup failed");
                return SnpReference::default();
            }
        };

        let mut primary = mappings.iter().filter(|m| m.is_primary());
        let reference_base = match (primary.next(), primary.next()) {
            (Some(mapping), None) if mapping.start == mapping.end => {
                match self.reference.reference_base(mapping).await {
                    Ok(base) => base,
                    Err(e) => {
                        tracing::warn!(%rsid, error = %e, "reference sequence lookup failed");
                        None
                    }
                }
            }
            _ => None,
        };

        SnpReference::new(mappings, reference_base)
    }
}
