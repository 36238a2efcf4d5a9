//! Ensembl REST as the reference-genome context

use super::allele::Base;
use super::classify::VariantMapping;
use super::resolver::ReferenceGenome;
use crate::rest::{FetchError, JsonFetcher};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Variant mappings and reference sequence from the Ensembl REST service.
pub struct EnsemblReference {
    fetcher: Arc<dyn JsonFetcher>,
    server: String,
}

impl EnsemblReference {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, server: impl Into<String>) -> Self {
        Self {
            fetcher,
            server: server.into(),
        }
    }
}

#[async_trait]
impl ReferenceGenome for EnsemblReference {
    async fn variant_mappings(&self, rsid: &str) -> Result<Vec<VariantMapping>, FetchError> {
        let path = format!("/variation/human/{}?content-type=application/json", rsid);
        let document = self.fetcher.get(&self.server, &path).await?;

        let mappings = document
            .get("mappings")
            .cloned()
            .ok_or_else(|| FetchError::MissingField(format!("mappings for {}", rsid)))?;
        Ok(serde_json::from_value(mappings)?)
    }

    async fn reference_base(&self, mapping: &VariantMapping) -> Result<Option<Base>, FetchError> {
        let path = format!(
            "/sequence/region/human/{}:{}..{}:1?content-type=application/json",
            mapping.seq_region_name, mapping.start, mapping.end
        );
        let document = self.fetcher.get(&self.server, &path).await?;

        let seq = document
            .get("seq")
            .and_then(Value::as_str)
            .ok_or_else(|| FetchError::MissingField("seq".to_string()))?;
        Ok(Base::parse(seq))
    }
}
