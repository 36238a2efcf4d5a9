//! Risk-allele orientation against the reference genome
//!
//! Decides whether the risk allele reported for a SNP is the base found on
//! the reference sequence at that position. Every way this can fail is a
//! distinct variant of [`AlleleOrientation`], so callers log and skip each
//! one on its own instead of catching a generic error.
//!
//! The decision itself is pure ([`classify`], [`combine`]); the
//! [`OrientationResolver`] only gathers the reference context it needs.

mod allele;
mod classify;
mod ensembl;
mod resolver;

pub use allele::{Base, RiskAlleleName};
pub use classify::{classify, SnpReference, VariantMapping};
pub use ensembl::EnsemblReference;
pub use resolver::{OrientationResolver, ReferenceGenome};

use std::fmt;

/// Outcome of resolving one or more candidate risk alleles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlleleOrientation {
    /// The risk allele is the reference base
    Present,
    /// The risk allele is not the reference base
    Absent,
    /// None of the candidates is a single-base substitution
    NoSubstitution,
    /// The variant maps to more than one reference position
    Ambiguous,
    /// Some candidates are present in the reference, others are not
    MixedPresence,
    /// The allele name carries no dbSNP accession
    NoAccession,
    /// The allele name carries no base (`rs123-?`, `rs123`)
    MissingBase,
    /// The reference base at the variant position could not be determined
    IndeterminateReference,
    /// Reference and variant data contradict each other
    DataIntegrity(String),
}

impl AlleleOrientation {
    /// `Some(present)` for a resolved orientation, `None` for every failure class.
    pub fn presence(&self) -> Option<bool> {
        match self {
            Self::Present => Some(true),
            Self::Absent => Some(false),
            _ => None,
        }
    }

    /// Failure classes that decide the whole risk-allele set on their own.
    ///
    /// `NoSubstitution` is not one of them: such a candidate is skipped in
    /// favour of its siblings.
    pub fn is_decisive_failure(&self) -> bool {
        !matches!(self, Self::Present | Self::Absent | Self::NoSubstitution)
    }
}

impl fmt::Display for AlleleOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "risk allele present in reference"),
            Self::Absent => write!(f, "risk allele not present in reference"),
            Self::NoSubstitution => write!(f, "none of the risk alleles is a substitution"),
            Self::Ambiguous => write!(f, "variant mapping is ambiguous"),
            Self::MixedPresence => {
                write!(f, "some risk alleles present in reference, others not")
            }
            Self::NoAccession => write!(f, "no dbSNP accession for risk allele"),
            Self::MissingBase => write!(f, "base in risk allele missing"),
            Self::IndeterminateReference => write!(f, "cannot determine reference base at SNP"),
            Self::DataIntegrity(detail) => write!(f, "data integrity problem: {}", detail),
        }
    }
}

/// Fold per-candidate outcomes into one orientation.
///
/// The first decisive failure wins. `NoSubstitution` candidates are dropped;
/// if nothing is left the set has no substitution. Candidates that disagree
/// are `MixedPresence` rather than broken by an arbitrary tie.
pub fn combine(outcomes: impl IntoIterator<Item = AlleleOrientation>) -> AlleleOrientation {
    let mut present = 0usize;
    let mut absent = 0usize;

    for outcome in outcomes {
        match outcome {
            AlleleOrientation::Present => present += 1,
            AlleleOrientation::Absent => absent += 1,
            AlleleOrientation::NoSubstitution => {}
            decisive => return decisive,
        }
    }

    match (present, absent) {
        (0, 0) => AlleleOrientation::NoSubstitution,
        (_, 0) => AlleleOrientation::Present,
        (0, _) => AlleleOrientation::Absent,
        _ => AlleleOrientation::MixedPresence,
    }
}
