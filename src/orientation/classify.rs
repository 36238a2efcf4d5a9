//! Pure classification of one candidate risk allele

use super::allele::{Base, RiskAlleleName};
use super::AlleleOrientation;
use serde::{Deserialize, Serialize};

/// Where a variant sits on the reference assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantMapping {
    pub seq_region_name: String,
    pub start: u64,
    pub end: u64,
    /// 1 or -1; the strand `allele_string` is given on
    pub strand: i8,
    /// Slash-separated alleles, reference first (`A/G`)
    pub allele_string: String,
    #[serde(default)]
    pub coord_system: Option<String>,
    #[serde(default)]
    pub assembly_name: Option<String>,
}

impl VariantMapping {
    /// Mappings on chromosomes proper; patches and haplotype regions are not.
    pub fn is_primary(&self) -> bool {
        match self.coord_system.as_deref() {
            Some(system) => system == "chromosome",
            None => true,
        }
    }

    /// Alleles on the forward strand, or `None` if any is not a single base.
    pub fn forward_alleles(&self) -> Option<Vec<Base>> {
        self.allele_string
            .split('/')
            .map(|allele| {
                let base = Base::parse(allele)?;
                Some(if self.strand < 0 { base.complement() } else { base })
            })
            .collect()
    }
}

/// Reference context gathered for one SNP.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnpReference {
    pub mappings: Vec<VariantMapping>,
    /// Forward-strand base at the sole primary mapping, when known
    pub reference_base: Option<Base>,
}

impl SnpReference {
    pub fn new(mappings: Vec<VariantMapping>, reference_base: Option<Base>) -> Self {
        Self {
            mappings,
            reference_base,
        }
    }
}

/// Classify a single candidate against its reference context.
///
/// The candidate is `Present` when its base (flipped to the forward strand
/// if it was reported on the other one) equals the reference base.
pub fn classify(name: &RiskAlleleName, reference: &SnpReference) -> AlleleOrientation {
    let Some(risk) = name.base() else {
        return AlleleOrientation::NoSubstitution;
    };

    let primary: Vec<&VariantMapping> = reference
        .mappings
        .iter()
        .filter(|m| m.is_primary())
        .collect();
    let mapping = match primary.as_slice() {
        [] => return AlleleOrientation::IndeterminateReference,
        [mapping] => *mapping,
        _ => return AlleleOrientation::Ambiguous,
    };

    if mapping.start != mapping.end {
        return AlleleOrientation::NoSubstitution;
    }
    let Some(alleles) = mapping.forward_alleles() else {
        return AlleleOrientation::NoSubstitution;
    };
    let Some(reference_base) = reference.reference_base else {
        return AlleleOrientation::IndeterminateReference;
    };

    if !alleles.contains(&reference_base) {
        return AlleleOrientation::DataIntegrity(format!(
            "reference base {} at {}:{} is not one of {}",
            reference_base, mapping.seq_region_name, mapping.start, mapping.allele_string
        ));
    }

    let risk = if alleles.contains(&risk) {
        risk
    } else if alleles.contains(&risk.complement()) {
        risk.complement()
    } else {
        return AlleleOrientation::DataIntegrity(format!(
            "risk allele {} is not one of {} on either strand",
            name.allele, mapping.allele_string
        ));
    };

    if risk == reference_base {
        AlleleOrientation::Present
    } else {
        AlleleOrientation::Absent
    }
}

#[cfg(test)]
pub(crate) fn snv(chrom: &str, pos: u64, strand: i8, alleles: &str) -> VariantMapping {
    VariantMapping {
        seq_region_name: chrom.to_string(),
        start: pos,
        end: pos,
        strand,
        allele_string: alleles.to_string(),
        coord_system: Some("chromosome".to_string()),
        assembly_name: Some("GRCh38".to_string()),
    }
}
