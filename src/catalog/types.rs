//! Wire shapes of the GWAS Catalog REST resources
//!
//! Only the fields read by the adapter are modelled; everything else in the
//! documents is ignored. Nullable collections decode as empty.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Link {
    pub href: String,
}

/// An entry of `_embedded.efoTraits`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EfoTrait {
    #[serde(rename = "trait")]
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(rename = "_links")]
    pub links: EfoTraitLinks,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EfoTraitLinks {
    pub associations: Link,
}

/// An entry of `_embedded.associations`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Association {
    pub pvalue: f64,
    #[serde(default)]
    pub pvalue_description: Option<String>,
    /// Confidence interval text, e.g. `[1.02-1.98]`
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub or_per_copy_num: Option<f64>,
    #[serde(default)]
    pub beta_num: Option<f64>,
    #[serde(default)]
    pub beta_unit: Option<String>,
    #[serde(default)]
    pub beta_direction: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub loci: Vec<Locus>,
    #[serde(rename = "_links")]
    pub links: AssociationLinks,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AssociationLinks {
    pub snps: Link,
    pub study: Link,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Locus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub strongest_risk_alleles: Vec<RiskAllele>,
}

impl Locus {
    pub fn risk_allele_names(&self) -> Vec<String> {
        self.strongest_risk_alleles
            .iter()
            .map(|allele| allele.risk_allele_name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RiskAllele {
    pub risk_allele_name: String,
}

/// The study behind an association.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Study {
    pub accession_id: String,
    pub publication_info: PublicationInfo,
    pub disease_trait: DiseaseTrait,
    /// Present on newer payloads; older ones only link to the collection
    #[serde(default)]
    pub ancestries: Option<Vec<Ancestry>>,
    #[serde(rename = "_links", default)]
    pub links: StudyLinks,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PublicationInfo {
    pub pubmed_id: Value,
}

impl PublicationInfo {
    /// The PubMed id, whether the payload gives it as text or a number.
    pub fn pubmed_id(&self) -> Option<String> {
        match &self.pubmed_id {
            Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DiseaseTrait {
    #[serde(rename = "trait")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct StudyLinks {
    #[serde(default)]
    pub ancestries: Option<Link>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Ancestry {
    #[serde(default)]
    pub number_of_individuals: Option<u64>,
}

/// Individuals across all ancestry groups; unreported counts add nothing.
pub(crate) fn total_individuals(ancestries: &[Ancestry]) -> u64 {
    ancestries
        .iter()
        .filter_map(|a| a.number_of_individuals)
        .sum()
}
