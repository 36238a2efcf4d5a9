//! Evidence sources: the shared contract and the registry that runs them

mod registry;
mod traits;

pub use registry::{GatherResult, SourceRegistry};
pub use traits::{GwasSource, SourceError, SourceQuery};
