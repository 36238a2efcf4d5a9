//! Risk-allele names and nucleotide bases

use super::AlleleOrientation;
use std::fmt;

/// A single nucleotide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    /// Parse a one-letter base, case-insensitively. Anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        let base = match chars.next()?.to_ascii_uppercase() {
            'A' => Self::A,
            'C' => Self::C,
            'G' => Self::G,
            'T' => Self::T,
            _ => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(base)
    }

    pub fn complement(self) -> Self {
        match self {
            Self::A => Self::T,
            Self::C => Self::G,
            Self::G => Self::C,
            Self::T => Self::A,
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::A => 'A',
            Self::C => 'C',
            Self::G => 'G',
            Self::T => 'T',
        };
        write!(f, "{}", c)
    }
}

/// A catalog risk-allele name such as `rs7329174-G`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAlleleName {
    pub rsid: String,
    /// Allele text after the last `-`; may be multi-base (`rs1-AT`)
    pub allele: String,
}

impl RiskAlleleName {
    /// Split a risk-allele name into accession and allele.
    ///
    /// Fails with `MissingBase` when there is no allele part or it is `?`,
    /// and with `NoAccession` when the prefix is not `rs` + digits.
    pub fn parse(raw: &str) -> Result<Self, AlleleOrientation> {
        let raw = raw.trim().trim_end_matches('\u{a0}');
        let (rsid, allele) = match raw.rsplit_once('-') {
            Some((rsid, allele)) => (rsid.trim(), allele.trim()),
            None => (raw, ""),
        };

        if !is_dbsnp_accession(rsid) {
            return Err(AlleleOrientation::NoAccession);
        }
        if allele.is_empty() || allele == "?" {
            return Err(AlleleOrientation::MissingBase);
        }

        Ok(Self {
            rsid: rsid.to_string(),
            allele: allele.to_string(),
        })
    }

    /// The allele as a single base, if it is one.
    pub fn base(&self) -> Option<Base> {
        Base::parse(&self.allele)
    }
}

/// `rs` followed by at least one digit and nothing else.
pub(crate) fn is_dbsnp_accession(id: &str) -> bool {
    id.strip_prefix("rs")
        .map(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}
