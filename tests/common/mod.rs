//! Shared fixtures for the integration tests
//!
//! Builds a databases directory holding one small file per flat-file source,
//! and a mock REST backend answering the catalog and Ensembl requests.

#![allow(dead_code)]

use gwas_sources::{GwasConfig, MockFetcher};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

pub const CATALOG: &str = "https://catalog.test";
pub const ENSEMBL: &str = "https://ensembl.test";
pub const T2D: &str = "http://www.ebi.ac.uk/efo/EFO_0001360";
pub const T2D_LABEL: &str = "type II diabetes mellitus";

/// A 71-column GRASP line with the fields the adapter reads filled in.
pub fn grasp_line(snp: &str, pvalue: &str, phenotype: &str, samples: &str, efo: &str) -> String {
    let mut fields: Vec<String> = (0..71).map(|i| format!("c{}", i)).collect();
    fields[4] = snp.to_string();
    fields[7] = "17463246".to_string();
    fields[10] = pvalue.to_string();
    fields[12] = phenotype.to_string();
    fields[24] = samples.to_string();
    fields[70] = efo.to_string();
    fields.join("\t")
}

fn write(dir: &Path, name: &str, lines: &[String]) {
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(dir.join(name), content).unwrap();
}

/// Databases directory with every flat-file source populated.
pub fn databases() -> TempDir {
    let dir = tempfile::tempdir().unwrap();

    write(
        dir.path(),
        "GRASP.txt",
        &[
            grasp_line("7903146", "1.2e-20", "Type 2 diabetes", "12000", T2D),
            grasp_line("12255372", "not-a-pvalue", "Type 2 diabetes", "12000", T2D),
            grasp_line("1111", "1e-5", "Asthma", "800", "N/A"),
        ],
    );
    write(
        dir.path(),
        "Phewas_Catalog.txt",
        &[format!(
            "10\trs7903146\tType 2 diabetes\t3013\t1.24e-12\t1.36\tTCF7L2\t250.2\tTRUE\t{}",
            T2D
        )],
    );
    write(
        dir.path(),
        "GWAS_DB.txt",
        &[format!(
            "10\t112998590\trs7903146\t3e-15\t17463246\tDiabetes Mellitus, Type 2\t{}",
            T2D
        )],
    );
    write(
        dir.path(),
        "Neale_UKB.txt",
        &["rs7903146\tType 2 diabetes\t2443\t2e-30\t337159\tNeale2017\tUKB_2443\tNA\t0.004\tincrease".to_string()],
    );
    write(
        dir.path(),
        "sumstats.tsv",
        &[
            "variant_id\tp-value\tbeta".to_string(),
            "rs7903146\t1e-40\t0.3".to_string(),
            "rs1\t0.5\t0.01".to_string(),
        ],
    );

    dir
}

pub fn config(databases: &Path) -> GwasConfig {
    GwasConfig {
        databases_dir: databases.to_path_buf(),
        summary_stats_file: Some(databases.join("sumstats.tsv")),
        catalog_server: CATALOG.to_string(),
        ensembl_server: ENSEMBL.to_string(),
        ..GwasConfig::default()
    }
}

fn association_page() -> Value {
    json!({
        "_embedded": { "associations": [ {
            "pvalue": 2.0e-8,
            "pvalueDescription": null,
            "range": "[1.31-1.43]",
            "orPerCopyNum": 1.37,
            "loci": [ { "strongestRiskAlleles": [ { "riskAlleleName": "rs7903146-T" } ] } ],
            "_links": {
                "snps": { "href": format!("{}/api/associations/1/snps", CATALOG) },
                "study": { "href": format!("{}/api/associations/1/study", CATALOG) }
            }
        } ] }
    })
}

/// Catalog and Ensembl responses for one T2D association on rs7903146.
pub fn rest_backend() -> MockFetcher {
    MockFetcher::new()
        .with_response(
            format!(
                "{}/gwas/rest/api/efoTraits/search/findByEfoUri?uri={}",
                CATALOG,
                urlencoding::encode(T2D)
            ),
            json!({
                "_embedded": { "efoTraits": [ {
                    "trait": T2D_LABEL,
                    "uri": T2D,
                    "_links": { "associations": { "href": format!("{}/api/efoTraits/71/associations", CATALOG) } }
                } ] }
            }),
        )
        .with_response(format!("{}/api/efoTraits/71/associations", CATALOG), association_page())
        .with_response(
            format!("{}/api/associations/1/snps", CATALOG),
            json!({ "_embedded": { "singleNucleotidePolymorphisms": [ { "rsId": "rs7903146" } ] } }),
        )
        .with_response(
            format!("{}/api/associations/1/study", CATALOG),
            json!({
                "accessionId": "GCST000001",
                "publicationInfo": { "pubmedId": "17463246" },
                "diseaseTrait": { "trait": "Type 2 diabetes" },
                "ancestries": [ { "numberOfIndividuals": 2931 } ]
            }),
        )
        .with_response(
            format!("{}/variation/human/rs7903146?content-type=application/json", ENSEMBL),
            json!({
                "name": "rs7903146",
                "mappings": [ {
                    "seq_region_name": "10",
                    "start": 112998590,
                    "end": 112998590,
                    "strand": 1,
                    "allele_string": "C/T",
                    "coord_system": "chromosome",
                    "assembly_name": "GRCh38"
                } ]
            }),
        )
        .with_response(
            format!(
                "{}/sequence/region/human/10:112998590..112998590:1?content-type=application/json",
                ENSEMBL
            ),
            json!({ "seq": "C" }),
        )
}
