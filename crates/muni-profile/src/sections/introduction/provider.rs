use async_trait::async_trait;
use chrono::NaiveDate;

use super::domain::{MunicipalityId, PeerSnapshot, RawFacts, SourceVersion};

/// Capability contract for raw-fact sources so census stores and test
/// doubles are interchangeable without touching the section manager.
#[async_trait]
pub trait FactProvider: Send + Sync {
    /// Full snapshot fetch for one municipality, optionally pinned to a
    /// historical cutoff.
    async fn fetch_raw_facts(
        &self,
        id: &MunicipalityId,
        as_of: Option<NaiveDate>,
    ) -> Result<RawFacts, ProviderError>;

    /// Metadata-only call used to fingerprint the current source state
    /// without paying for a full fetch.
    async fn fetch_source_version(&self, id: &MunicipalityId)
        -> Result<SourceVersion, ProviderError>;

    /// Peer-municipality populations for ranking. Sources without peer
    /// data return an empty list and the ranking narrative is omitted.
    async fn fetch_peer_snapshots(
        &self,
        _id: &MunicipalityId,
    ) -> Result<Vec<PeerSnapshot>, ProviderError> {
        Ok(Vec::new())
    }
}

/// Error enumeration for provider failures.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("municipality '{0}' is not known to the data source")]
    UnknownMunicipality(MunicipalityId),
    #[error("source data unavailable: {0}")]
    Unavailable(String),
}
