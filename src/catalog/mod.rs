//! GWAS Catalog — associations from the EBI GWAS Catalog REST service
//!
//! The catalog is a hypermedia API, so each record takes several hops:
//!
//! ```text
//! efoTraits search ─► trait ─► associations (paged) ─► association
//!                                                     ├─► snps
//!                                                     └─► study ─► ancestries
//! ```
//!
//! Each association's risk alleles are oriented against the reference
//! genome before a record is emitted. A failed hop drops only the item it
//! belongs to; the source itself never fails.

mod types;

use crate::model::{Disease, GwasAssociation, SampleSize};
use crate::orientation::OrientationResolver;
use crate::rest::{embedded, link_href, JsonFetcher};
use crate::source::{GwasSource, SourceError, SourceQuery};
use async_trait::async_trait;
use regex_lite::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use types::{total_individuals, Ancestry, Association, EfoTrait, Study};

const TRAIT_SEARCH: &str = "/gwas/rest/api/efoTraits/search";

/// One trait query against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TraitSearch<'a> {
    Iri(&'a str),
    Name(&'a str),
}

impl TraitSearch<'_> {
    fn path(&self) -> String {
        match self {
            Self::Iri(iri) => format!(
                "{}/findByEfoUri?uri={}",
                TRAIT_SEARCH,
                urlencoding::encode(iri)
            ),
            Self::Name(name) => format!(
                "{}/findByEfoTrait?trait={}",
                TRAIT_SEARCH,
                urlencoding::encode(name)
            ),
        }
    }

    fn term(&self) -> &str {
        match self {
            Self::Iri(term) | Self::Name(term) => *term,
        }
    }

    /// Ontology id recorded on the disease of every record found.
    fn disease_efo(&self, efo_trait: &EfoTrait) -> String {
        match self {
            Self::Iri(iri) => iri.to_string(),
            Self::Name(_) => efo_trait
                .uri
                .clone()
                .unwrap_or_else(|| crate::flatfile::UNMAPPED_EFO.to_string()),
        }
    }
}

/// Per-association context shared by all of its SNPs.
struct StudyContext {
    accession: String,
    publication: String,
    reported_trait: String,
    sample_size: SampleSize,
}

pub struct GwasCatalog {
    fetcher: Arc<dyn JsonFetcher>,
    server: String,
    resolver: OrientationResolver,
}

impl GwasCatalog {
    pub const DISPLAY_NAME: &'static str = "GWAS Catalog";

    pub fn new(
        fetcher: Arc<dyn JsonFetcher>,
        server: impl Into<String>,
        resolver: OrientationResolver,
    ) -> Self {
        Self {
            fetcher,
            server: server.into(),
            resolver,
        }
    }

    async fn query(&self, search: TraitSearch<'_>) -> Vec<GwasAssociation> {
        tracing::info!("Querying GWAS catalog for {}", search.term());

        let document = match self.fetcher.get(&self.server, &search.path()).await {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(term = search.term(), error = %e, "trait search failed");
                return Vec::new();
            }
        };

        let mut found = Vec::new();
        for item in embedded(&document, "efoTraits") {
            let efo_trait: EfoTrait = match serde_json::from_value(item.clone()) {
                Ok(efo_trait) => efo_trait,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed trait");
                    continue;
                }
            };
            let disease = Disease::new(efo_trait.name.clone(), search.disease_efo(&efo_trait));
            tracing::info!("Querying GWAS catalog for SNPs associated with {}", efo_trait.name);

            let Some(associations) = self.associations(&efo_trait.links.associations.href).await
            else {
                continue;
            };
            tracing::info!("Received {} associations with SNPs.", associations.len());

            for item in &associations {
                found.extend(self.association_records(item, &disease).await);
            }
        }

        if found.is_empty() {
            tracing::info!("Found no associated SNPs and pvalues.");
        } else {
            tracing::info!("Fetched {} SNPs and pvalues.", found.len());
        }
        found
    }

    /// Every association item reachable from `href`, following `next` links.
    ///
    /// `None` if the first page cannot be fetched. A failure further on keeps
    /// the pages already read.
    async fn associations(&self, href: &str) -> Option<Vec<Value>> {
        let mut visited = HashSet::new();
        let mut items = Vec::new();
        let mut next = Some(href.to_string());

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                tracing::warn!(%url, "association pages link back to a visited page");
                break;
            }
            match self.fetcher.get(&url, "").await {
                Ok(page) => {
                    items.extend(embedded(&page, "associations").iter().cloned());
                    next = link_href(&page, "next").map(str::to_string);
                }
                Err(e) if visited.len() == 1 => {
                    tracing::warn!(%url, error = %e, "association fetch failed");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(%url, error = %e, "association page fetch failed; keeping earlier pages");
                    break;
                }
            }
        }

        Some(items)
    }

    async fn association_records(&self, item: &Value, disease: &Disease) -> Vec<GwasAssociation> {
        let association: Association = match serde_json::from_value(item.clone()) {
            Ok(association) => association,
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed association");
                return Vec::new();
            }
        };

        let snps_url = &association.links.snps.href;
        let snps = match self.fetcher.get(snps_url, "").await {
            Ok(document) => embedded(&document, "singleNucleotidePolymorphisms").to_vec(),
            Err(e) => {
                tracing::warn!(url = %snps_url, error = %e, "SNP fetch failed; skipping association");
                return Vec::new();
            }
        };
        if snps.is_empty() {
            return Vec::new();
        }

        let Some(study) = self.study(&association.links.study.href).await else {
            return Vec::new();
        };

        let snps: Vec<(String, Value)> = snps
            .into_iter()
            .filter_map(|snp| Some((accepted_rsid(&snp, snps_url)?, snp)))
            .collect();
        if snps.is_empty() {
            return Vec::new();
        }

        // one orientation per locus, shared by every SNP of the association
        let mut orientations = Vec::with_capacity(association.loci.len());
        for locus in &association.loci {
            orientations.push(self.resolver.resolve(&locus.risk_allele_names()).await);
        }

        let confidence_interval = association.range.as_deref().and_then(confidence_interval);
        let mut records = Vec::new();

        for (rsid, snp) in &snps {
            tracing::debug!(
                "received association with snp rsId: {:12} with a pvalue of {}",
                rsid,
                association.pvalue
            );

            for orientation in &orientations {
                let Some(present) = orientation.presence() else {
                    tracing::warn!(%rsid, %orientation, "Skipping this snp.");
                    continue;
                };

                let record = GwasAssociation::new(
                    rsid.as_str(),
                    association.pvalue,
                    Self::DISPLAY_NAME,
                    study.publication.as_str(),
                )
                .with_disease(Some(disease.clone()))
                .with_reported_trait(study.reported_trait.as_str())
                .with_pvalue_description(association.pvalue_description.clone())
                .with_sample_size(study.sample_size)
                .with_odds_ratio(association.or_per_copy_num)
                .with_confidence_interval(confidence_interval)
                .with_beta(
                    association.beta_num,
                    association.beta_unit.clone(),
                    association.beta_direction.clone(),
                )
                .with_study(Some(study.accession.clone()))
                .with_risk_alleles_present(Some(present))
                .with_rest_hash(snp.clone());

                records.extend(record.checked());
            }
        }

        records
    }

    async fn study(&self, href: &str) -> Option<StudyContext> {
        let document = match self.fetcher.get(href, "").await {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(url = %href, error = %e, "study fetch failed; skipping association");
                return None;
            }
        };
        let study: Study = match serde_json::from_value(document) {
            Ok(study) => study,
            Err(e) => {
                tracing::warn!(url = %href, error = %e, "malformed study; skipping association");
                return None;
            }
        };
        let Some(pubmed_id) = study.publication_info.pubmed_id() else {
            tracing::warn!(url = %href, "study has no PubMed id; skipping association");
            return None;
        };

        let sample_size = match &study.ancestries {
            Some(ancestries) => SampleSize::Known(total_individuals(ancestries)),
            None => self.linked_sample_size(&study).await,
        };

        Some(StudyContext {
            accession: study.accession_id,
            publication: format!("PMID{}", pubmed_id),
            reported_trait: study.disease_trait.name,
            sample_size,
        })
    }

    async fn linked_sample_size(&self, study: &Study) -> SampleSize {
        let Some(link) = &study.links.ancestries else {
            return SampleSize::Unknown;
        };
        let ancestries = match self.fetcher.get(&link.href, "").await {
            Ok(document) => embedded(&document, "ancestries").to_vec(),
            Err(e) => {
                tracing::warn!(url = %link.href, error = %e, "ancestry fetch failed");
                return SampleSize::Unknown;
            }
        };
        match serde_json::from_value::<Vec<Ancestry>>(Value::Array(ancestries)) {
            Ok(ancestries) => SampleSize::Known(total_individuals(&ancestries)),
            Err(e) => {
                tracing::warn!(url = %link.href, error = %e, "malformed ancestries");
                SampleSize::Unknown
            }
        }
    }
}

/// The SNP's `rsId`, if it is a usable dbSNP accession.
fn accepted_rsid(snp: &Value, snps_url: &str) -> Option<String> {
    let raw = snp.get("rsId").and_then(Value::as_str).unwrap_or_default();
    if !raw.contains("rs") {
        tracing::warn!("Did not get a valid dbSNP accession: ({}) from {}", raw, snps_url);
        return None;
    }
    let rsid = raw.trim_end_matches('\u{a0}').trim();
    (rsid != "6").then(|| rsid.to_string())
}

/// The first two decimal numbers in a range such as `[1.02-1.98]`.
fn confidence_interval(range: &str) -> Option<(f64, f64)> {
    static NUMBER: OnceLock<Option<Regex>> = OnceLock::new();
    let number = NUMBER
        .get_or_init(|| Regex::new(r"\d+\.\d+").ok())
        .as_ref()?;
    let mut bounds = number.find_iter(range).filter_map(|m| m.as_str().parse().ok());
    Some((bounds.next()?, bounds.next()?))
}

#[async_trait]
impl GwasSource for GwasCatalog {
    fn display_name(&self) -> &str {
        Self::DISPLAY_NAME
    }

    async fn run(&self, query: &SourceQuery) -> Result<Vec<GwasAssociation>, SourceError> {
        let mut found = Vec::new();

        if !query.iris.is_empty() {
            for iri in &query.iris {
                found.extend(self.query(TraitSearch::Iri(iri)).await);
            }
        } else {
            for name in &query.diseases {
                found.extend(self.query(TraitSearch::Name(name)).await);
            }
        }

        tracing::debug!(
            "Found {} GWAS SNPs associated to {} in GWAS Catalog",
            found.len(),
            query.describe()
        );
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::{Base, ReferenceGenome, VariantMapping};
    use crate::rest::{FetchError, MockFetcher};
    use serde_json::json;
    use std::collections::HashMap;

    const SERVER: &str = "https://www.ebi.ac.uk";
    const API: &str = "https://www.ebi.ac.uk/gwas/rest/api";
    const T2D: &str = "http://www.ebi.ac.uk/efo/EFO_0001360";

    // === Test reference genome ===

    /// Forward-strand SNVs with a known reference base.
    #[derive(Default)]
    struct FixedGenome {
        variants: HashMap<String, (VariantMapping, Base)>,
    }

    impl FixedGenome {
        fn with_snv(mut self, rsid: &str, alleles: &str, reference: Base) -> Self {
            let mapping = VariantMapping {
                seq_region_name: "10".into(),
                start: 100,
                end: 100,
                strand: 1,
                allele_string: alleles.into(),
                coord_system: Some("chromosome".into()),
                assembly_name: Some("GRCh38".into()),
            };
            self.variants.insert(rsid.into(), (mapping, reference));
            self
        }
    }

    #[async_trait]
    impl ReferenceGenome for FixedGenome {
        async fn variant_mappings(&self, rsid: &str) -> Result<Vec<VariantMapping>, FetchError> {
            Ok(self
                .variants
                .get(rsid)
                .map(|(mapping, _)| vec![mapping.clone()])
                .unwrap_or_default())
        }

        async fn reference_base(&self, mapping: &VariantMapping) -> Result<Option<Base>, FetchError> {
            Ok(self
                .variants
                .values()
                .find(|(m, _)| m == mapping)
                .map(|(_, base)| *base))
        }
    }

    fn genome() -> FixedGenome {
        FixedGenome::default()
            .with_snv("rs7903146", "C/T", Base::C)
            .with_snv("rs1111", "G/A", Base::G)
    }

    fn catalog(fetcher: MockFetcher) -> (GwasCatalog, Arc<MockFetcher>) {
        let fetcher = Arc::new(fetcher);
        let resolver = OrientationResolver::new(Arc::new(genome()));
        (GwasCatalog::new(fetcher.clone(), SERVER, resolver), fetcher)
    }

    fn trait_search(path: &str, name: &str, uri: &str, id: u32) -> (String, Value) {
        (
            format!("{}/gwas/rest/api/efoTraits/search/{}", SERVER, path),
            json!({
                "_embedded": { "efoTraits": [ {
                    "trait": name,
                    "uri": uri,
                    "_links": { "associations": { "href": format!("{}/efoTraits/{}/associations", API, id) } }
                } ] }
            }),
        )
    }

    fn association(id: u32, risk_alleles: &[&str], range: Value) -> Value {
        let alleles: Vec<Value> = risk_alleles
            .iter()
            .map(|name| json!({ "riskAlleleName": name }))
            .collect();
        json!({
            "pvalue": 2.0e-8,
            "pvalueDescription": null,
            "range": range,
            "orPerCopyNum": 1.37,
            "betaNum": null,
            "betaUnit": null,
            "betaDirection": null,
            "loci": [ { "strongestRiskAlleles": alleles } ],
            "_links": {
                "snps": { "href": format!("{}/associations/{}/snps", API, id) },
                "study": { "href": format!("{}/associations/{}/study", API, id) }
            }
        })
    }

    fn snps(rsids: &[&str]) -> Value {
        let items: Vec<Value> = rsids
            .iter()
            .map(|rsid| json!({ "rsId": rsid, "merged": 0 }))
            .collect();
        json!({ "_embedded": { "singleNucleotidePolymorphisms": items } })
    }

    fn study() -> Value {
        json!({
            "accessionId": "GCST000001",
            "publicationInfo": { "pubmedId": "17463246" },
            "diseaseTrait": { "trait": "Type 2 diabetes" },
            "ancestries": [
                { "type": "initial", "numberOfIndividuals": 3000 },
                { "type": "replication", "numberOfIndividuals": null },
                { "type": "replication", "numberOfIndividuals": 928 }
            ]
        })
    }

    /// IRI search for T2D, resolving to trait 71.
    fn t2d_search() -> (String, Value) {
        let path = format!("findByEfoUri?uri={}", urlencoding::encode(T2D));
        trait_search(&path, "type II diabetes mellitus", T2D, 71)
    }

    /// Trait 71 with one association (id 1) on rs7903146.
    fn single_association_fetcher() -> MockFetcher {
        let (search_url, search) = t2d_search();
        MockFetcher::new()
            .with_response(search_url, search)
            .with_response(
                format!("{}/efoTraits/71/associations", API),
                json!({ "_embedded": { "associations": [ association(1, &["rs7903146-T"], json!("[1.31-1.43]")) ] } }),
            )
            .with_response(format!("{}/associations/1/snps", API), snps(&["rs7903146"]))
            .with_response(format!("{}/associations/1/study", API), study())
    }

    // === Scenario: IRI query walks trait → associations → snps/study ===
    #[tokio::test]
    async fn iri_query_builds_oriented_record() {
        let (catalog, _) = catalog(single_association_fetcher());

        let found = catalog
            .run(&SourceQuery::new(Vec::<String>::new(), vec![T2D]))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        let record = &found[0];
        assert_eq!(record.snp, "rs7903146");
        assert_eq!(record.pvalue, 2.0e-8);
        assert_eq!(record.source, "GWAS Catalog");
        assert_eq!(record.publication, "PMID17463246");
        assert_eq!(record.study.as_deref(), Some("GCST000001"));
        assert_eq!(record.reported_trait, "Type 2 diabetes");
        assert_eq!(record.disease, Some(Disease::new("type II diabetes mellitus", T2D)));
        assert_eq!(record.sample_size, SampleSize::Known(3928));
        assert_eq!(record.odds_ratio, Some(1.37));
        assert_eq!(record.odds_ratio_ci_start, Some(1.31));
        assert_eq!(record.odds_ratio_ci_end, Some(1.43));
        // T is the alternate allele at a C reference
        assert_eq!(record.risk_alleles_present_in_reference, Some(false));
        assert_eq!(record.rest_hash.as_ref().unwrap()["rsId"], "rs7903146");
    }

    #[tokio::test]
    async fn name_query_is_used_only_without_iris() {
        let (search_url, search) = trait_search("findByEfoTrait?trait=asthma", "asthma", "http://www.ebi.ac.uk/efo/EFO_0000270", 5);
        let fetcher = MockFetcher::new()
            .with_response(search_url, search)
            .with_response(
                format!("{}/efoTraits/5/associations", API),
                json!({ "_embedded": { "associations": [ association(9, &["rs1111-G"], Value::Null) ] } }),
            )
            .with_response(format!("{}/associations/9/snps", API), snps(&["rs1111"]))
            .with_response(format!("{}/associations/9/study", API), study());
        let (catalog, fetcher) = catalog(fetcher);

        let found = catalog
            .run(&SourceQuery::new(vec!["asthma"], Vec::<String>::new()))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].risk_alleles_present_in_reference, Some(true));
        assert_eq!(
            found[0].disease.as_ref().map(|d| d.efo.as_str()),
            Some("http://www.ebi.ac.uk/efo/EFO_0000270")
        );
        assert_eq!(found[0].odds_ratio_ci_start, None);
        assert!(fetcher.requests().iter().all(|url| !url.contains("findByEfoUri")));
    }

    #[tokio::test]
    async fn empty_query_performs_no_requests() {
        let (catalog, fetcher) = catalog(MockFetcher::new());
        let found = catalog.run(&SourceQuery::default()).await.unwrap();

        assert!(found.is_empty());
        assert!(fetcher.requests().is_empty());
    }

    // === Scenario: associations are paged via _links.next ===
    #[tokio::test]
    async fn follows_pagination_without_revisiting() {
        let page_1 = format!("{}/efoTraits/71/associations", API);
        let page_2 = format!("{}/efoTraits/71/associations?page=1", API);
        let (search_url, search) = t2d_search();
        let fetcher = MockFetcher::new()
            .with_response(search_url, search)
            .with_response(
                page_1.clone(),
                json!({
                    "_embedded": { "associations": [ association(1, &["rs7903146-T"], Value::Null) ] },
                    "_links": { "next": { "href": page_2.clone() } }
                }),
            )
            .with_response(
                page_2.clone(),
                json!({
                    "_embedded": { "associations": [ association(2, &["rs1111-G"], Value::Null) ] },
                    // a cycle back to the first page must not loop
                    "_links": { "next": { "href": page_1.clone() } }
                }),
            )
            .with_response(format!("{}/associations/1/snps", API), snps(&["rs7903146"]))
            .with_response(format!("{}/associations/1/study", API), study())
            .with_response(format!("{}/associations/2/snps", API), snps(&["rs1111"]))
            .with_response(format!("{}/associations/2/study", API), study());
        let (catalog, fetcher) = catalog(fetcher);

        let found = catalog
            .run(&SourceQuery::new(Vec::<String>::new(), vec![T2D]))
            .await
            .unwrap();

        let snps: Vec<_> = found.iter().map(|r| r.snp.as_str()).collect();
        assert_eq!(snps, vec!["rs7903146", "rs1111"]);
        let page_1_fetches = fetcher.requests().iter().filter(|url| **url == page_1).count();
        assert_eq!(page_1_fetches, 1);
    }

    // === Scenario: one failing association does not abort the trait ===
    #[tokio::test]
    async fn failed_snp_fetch_skips_only_that_association() {
        let (search_url, search) = t2d_search();
        let fetcher = MockFetcher::new()
            .with_response(search_url, search)
            .with_response(
                format!("{}/efoTraits/71/associations", API),
                json!({ "_embedded": { "associations": [
                    association(1, &["rs7903146-T"], Value::Null),
                    association(2, &["rs1111-G"], Value::Null),
                    { "pvalue": "not a number" }
                ] } }),
            )
            .with_failure(format!("{}/associations/1/snps", API))
            .with_response(format!("{}/associations/2/snps", API), snps(&["rs1111"]))
            .with_response(format!("{}/associations/2/study", API), study());
        let (catalog, _) = catalog(fetcher);

        let found = catalog
            .run(&SourceQuery::new(Vec::<String>::new(), vec![T2D]))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].snp, "rs1111");
    }

    #[tokio::test]
    async fn failed_study_fetch_skips_only_that_association() {
        let (search_url, search) = t2d_search();
        let fetcher = MockFetcher::new()
            .with_response(search_url, search)
            .with_response(
                format!("{}/efoTraits/71/associations", API),
                json!({ "_embedded": { "associations": [
                    association(1, &["rs7903146-T"], Value::Null),
                    association(2, &["rs1111-G"], Value::Null)
                ] } }),
            )
            .with_response(format!("{}/associations/1/snps", API), snps(&["rs7903146"]))
            .with_failure(format!("{}/associations/1/study", API))
            .with_response(format!("{}/associations/2/snps", API), snps(&["rs1111"]))
            .with_response(format!("{}/associations/2/study", API), study());
        let (catalog, _) = catalog(fetcher);

        let found = catalog
            .run(&SourceQuery::new(Vec::<String>::new(), vec![T2D]))
            .await
            .unwrap();

        let snps: Vec<_> = found.iter().map(|r| r.snp.as_str()).collect();
        assert_eq!(snps, vec!["rs1111"]);
    }

    #[tokio::test]
    async fn failed_later_page_keeps_earlier_pages() {
        let page_2 = format!("{}/efoTraits/71/associations?page=1", API);
        let (search_url, search) = t2d_search();
        let fetcher = MockFetcher::new()
            .with_response(search_url, search)
            .with_response(
                format!("{}/efoTraits/71/associations", API),
                json!({
                    "_embedded": { "associations": [ association(1, &["rs7903146-T"], Value::Null) ] },
                    "_links": { "next": { "href": page_2.clone() } }
                }),
            )
            .with_failure(page_2.clone())
            .with_response(format!("{}/associations/1/snps", API), snps(&["rs7903146"]))
            .with_response(format!("{}/associations/1/study", API), study());
        let (catalog, fetcher) = catalog(fetcher);

        let found = catalog
            .run(&SourceQuery::new(Vec::<String>::new(), vec![T2D]))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].snp, "rs7903146");
        assert!(fetcher.requests().contains(&page_2));
    }

    #[tokio::test]
    async fn failed_ancestry_fetch_leaves_sample_size_unknown() {
        let mut linked_study = study();
        linked_study.as_object_mut().unwrap().remove("ancestries");
        linked_study["_links"] = json!({ "ancestries": { "href": format!("{}/studies/1/ancestries", API) } });

        let (search_url, search) = t2d_search();
        let fetcher = MockFetcher::new()
            .with_response(search_url, search)
            .with_response(
                format!("{}/efoTraits/71/associations", API),
                json!({ "_embedded": { "associations": [ association(1, &["rs7903146-C"], Value::Null) ] } }),
            )
            .with_response(format!("{}/associations/1/snps", API), snps(&["rs7903146"]))
            .with_response(format!("{}/associations/1/study", API), linked_study)
            .with_failure(format!("{}/studies/1/ancestries", API));
        let (catalog, _) = catalog(fetcher);

        let found = catalog
            .run(&SourceQuery::new(Vec::<String>::new(), vec![T2D]))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sample_size, SampleSize::Unknown);
    }

    #[test]
    fn search_terms_are_percent_encoded() {
        assert_eq!(
            TraitSearch::Name("cancer & smoking #2").path(),
            "/gwas/rest/api/efoTraits/search/findByEfoTrait?trait=cancer%20%26%20smoking%20%232"
        );
        assert_eq!(
            TraitSearch::Iri("http://www.ebi.ac.uk/efo/EFO_0001360").path(),
            "/gwas/rest/api/efoTraits/search/findByEfoUri?uri=http%3A%2F%2Fwww.ebi.ac.uk%2Fefo%2FEFO_0001360"
        );
    }

    #[tokio::test]
    async fn association_without_snps_is_skipped() {
        let (search_url, search) = t2d_search();
        let fetcher = MockFetcher::new()
            .with_response(search_url, search)
            .with_response(
                format!("{}/efoTraits/71/associations", API),
                json!({ "_embedded": { "associations": [ association(1, &["rs7903146-T"], Value::Null) ] } }),
            )
            .with_response(format!("{}/associations/1/snps", API), snps(&[]));
        let (catalog, fetcher) = catalog(fetcher);

        let found = catalog
            .run(&SourceQuery::new(Vec::<String>::new(), vec![T2D]))
            .await
            .unwrap();

        assert!(found.is_empty());
        // the study is never fetched for an association with no SNPs
        assert!(fetcher.requests().iter().all(|url| !url.ends_with("/study")));
    }

    #[tokio::test]
    async fn invalid_accessions_are_rejected() {
        let (search_url, search) = t2d_search();
        let fetcher = MockFetcher::new()
            .with_response(search_url, search)
            .with_response(
                format!("{}/efoTraits/71/associations", API),
                json!({ "_embedded": { "associations": [ association(1, &["rs7903146-T"], Value::Null) ] } }),
            )
            .with_response(
                format!("{}/associations/1/snps", API),
                snps(&["chr10:112998590", "6", "rs7903146\u{a0}"]),
            )
            .with_response(format!("{}/associations/1/study", API), study());
        let (catalog, _) = catalog(fetcher);

        let found = catalog
            .run(&SourceQuery::new(Vec::<String>::new(), vec![T2D]))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].snp, "rs7903146");
    }

    // === Scenario: unresolvable orientation skips the locus ===
    #[tokio::test]
    async fn unresolved_orientation_emits_nothing() {
        let (search_url, search) = t2d_search();
        let fetcher = MockFetcher::new()
            .with_response(search_url, search)
            .with_response(
                format!("{}/efoTraits/71/associations", API),
                json!({ "_embedded": { "associations": [ association(1, &["rs7903146-?"], Value::Null) ] } }),
            )
            .with_response(format!("{}/associations/1/snps", API), snps(&["rs7903146"]))
            .with_response(format!("{}/associations/1/study", API), study());
        let (catalog, _) = catalog(fetcher);

        let found = catalog
            .run(&SourceQuery::new(Vec::<String>::new(), vec![T2D]))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn linked_ancestries_give_sample_size() {
        let mut linked_study = study();
        linked_study.as_object_mut().unwrap().remove("ancestries");
        linked_study["_links"] = json!({ "ancestries": { "href": format!("{}/studies/1/ancestries", API) } });

        let (search_url, search) = t2d_search();
        let fetcher = MockFetcher::new()
            .with_response(search_url, search)
            .with_response(
                format!("{}/efoTraits/71/associations", API),
                json!({ "_embedded": { "associations": [ association(1, &["rs7903146-C"], Value::Null) ] } }),
            )
            .with_response(format!("{}/associations/1/snps", API), snps(&["rs7903146"]))
            .with_response(format!("{}/associations/1/study", API), linked_study)
            .with_response(
                format!("{}/studies/1/ancestries", API),
                json!({ "_embedded": { "ancestries": [ { "numberOfIndividuals": 1200 } ] } }),
            );
        let (catalog, _) = catalog(fetcher);

        let found = catalog
            .run(&SourceQuery::new(Vec::<String>::new(), vec![T2D]))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sample_size, SampleSize::Known(1200));
        assert_eq!(found[0].risk_alleles_present_in_reference, Some(true));
    }

    #[tokio::test]
    async fn failed_trait_search_is_empty_not_an_error() {
        let (catalog, _) = catalog(MockFetcher::new());
        let found = catalog
            .run(&SourceQuery::new(Vec::<String>::new(), vec![T2D]))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn confidence_interval_needs_two_bounds() {
        assert_eq!(confidence_interval("[1.02-1.98]"), Some((1.02, 1.98)));
        assert_eq!(confidence_interval("[NR] unit increase"), None);
        assert_eq!(confidence_interval("[1.5]"), None);
    }
}
