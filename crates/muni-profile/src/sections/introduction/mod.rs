//! Introduction section of the municipal profile report.
//!
//! The manager reconciles raw census facts into a deterministic, versioned
//! content object: narrative paragraphs, a ward table, and a chart
//! descriptor. Builds are cached by source fingerprint and serialized
//! per municipality so concurrent report runs never duplicate the
//! aggregation work.

mod assembler;
pub mod domain;
mod fingerprint;
mod manager;
pub mod metrics;
pub mod provider;
mod router;
pub mod store;

#[cfg(test)]
mod tests;

pub use assembler::ContentAssembler;
pub use domain::{
    ChartKind, ContentBlock, DataQualityWarning, Locale, MunicipalityId, MunicipalityKind,
    ParamsError, PeerSnapshot, PriorCensus, RawFacts, SectionContent, SectionParams, SeriesPoint,
    SourceVersion, WardFacts,
};
pub use fingerprint::Fingerprint;
pub use manager::{IntroductionManager, SectionBuildError};
pub use metrics::{
    Derivation, DerivedMetrics, MetricDeriver, MetricError, MetricsPolicy, PeerRank, WardShare,
};
pub use provider::{FactProvider, ProviderError};
pub use router::introduction_router;
pub use store::{BuildKey, ContentStore, InMemoryContentStore, StoreError, StoredSection};
