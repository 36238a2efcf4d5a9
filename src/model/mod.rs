//! Normalized association records

mod association;

pub use association::{Disease, GwasAssociation, SampleSize};
pub(crate) use association::pubmed_citation;
