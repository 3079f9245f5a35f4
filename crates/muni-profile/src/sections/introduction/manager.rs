use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use super::assembler::ContentAssembler;
use super::domain::{MunicipalityId, ParamsError, SectionContent, SectionParams};
use super::fingerprint::Fingerprint;
use super::metrics::{MetricDeriver, MetricError, MetricsPolicy};
use super::provider::{FactProvider, ProviderError};
use super::store::{BuildKey, ContentStore, StoreError, StoredSection};
use crate::sections::SectionKind;

const DEFAULT_BUILD_TIMEOUT: Duration = Duration::from_secs(10);

/// Orchestrates fetch, derivation, assembly, and caching for the
/// introduction section.
///
/// Builds for one `(municipality, params)` key are strictly serialized:
/// concurrent callers on a cache miss wait on a per-key lock, re-check the
/// store once they hold it, and at most one of them performs the
/// fetch-derive-assemble-store sequence. Builds for different keys never
/// contend. The lock guard is released by drop on every exit path, so an
/// abandoned build cannot starve other waiters.
pub struct IntroductionManager<P, S> {
    provider: Arc<P>,
    store: Arc<S>,
    deriver: MetricDeriver,
    build_timeout: Duration,
    builds: Mutex<HashMap<BuildKey, Arc<AsyncMutex<()>>>>,
}

impl<P, S> IntroductionManager<P, S>
where
    P: FactProvider + 'static,
    S: ContentStore + 'static,
{
    pub fn new(provider: Arc<P>, store: Arc<S>, policy: MetricsPolicy) -> Self {
        Self {
            provider,
            store,
            deriver: MetricDeriver::new(policy),
            build_timeout: DEFAULT_BUILD_TIMEOUT,
            builds: Mutex::new(HashMap::new()),
        }
    }

    /// Bound the wait on an in-flight build for the same key. Exceeding it
    /// surfaces `BuildTimeout` instead of silently serving stale data.
    pub fn with_build_timeout(mut self, timeout: Duration) -> Self {
        self.build_timeout = timeout;
        self
    }

    /// Return the introduction content for a municipality, building it if
    /// the store has no entry for the current source fingerprint.
    pub async fn get(
        &self,
        municipality: &MunicipalityId,
        params: SectionParams,
    ) -> Result<SectionContent, SectionBuildError> {
        let version = self.provider.fetch_source_version(municipality).await?;

        if let Some(requested) = params.as_of {
            if requested < version.earliest_record {
                return Err(ParamsError::AsOfBeforeRecords {
                    requested,
                    earliest: version.earliest_record,
                }
                .into());
            }
        }

        let fingerprint = Fingerprint::compute(&version, &params);
        let key = BuildKey {
            municipality: municipality.clone(),
            params,
        };

        if let Some(hit) = self.lookup_current(&key, &fingerprint)? {
            debug!(%municipality, fingerprint = hit.fingerprint.short(), "introduction served from store");
            return Ok(hit.content);
        }

        let slot = self.build_slot(&key);
        let outcome = self.build_under_lock(&key, &slot, fingerprint).await;
        self.release_slot(&key, &slot);
        outcome
    }

    async fn build_under_lock(
        &self,
        key: &BuildKey,
        slot: &Arc<AsyncMutex<()>>,
        fingerprint: Fingerprint,
    ) -> Result<SectionContent, SectionBuildError> {
        let _guard = tokio::time::timeout(self.build_timeout, slot.lock())
            .await
            .map_err(|_| SectionBuildError::BuildTimeout)?;

        // Another caller may have completed the build while we waited.
        if let Some(hit) = self.lookup_current(key, &fingerprint)? {
            return Ok(hit.content);
        }

        let content = self.build(key, fingerprint.clone()).await?;
        self.store.store(
            key.clone(),
            StoredSection {
                fingerprint,
                content: content.clone(),
            },
        )?;
        Ok(content)
    }

    /// Drop any cached entry for the key; the next `get` rebuilds.
    pub fn invalidate(
        &self,
        municipality: &MunicipalityId,
        params: SectionParams,
    ) -> Result<(), SectionBuildError> {
        let key = BuildKey {
            municipality: municipality.clone(),
            params,
        };
        self.store.invalidate(&key)?;
        Ok(())
    }

    fn lookup_current(
        &self,
        key: &BuildKey,
        fingerprint: &Fingerprint,
    ) -> Result<Option<StoredSection>, SectionBuildError> {
        match self.store.lookup(key)? {
            Some(hit) if hit.fingerprint == *fingerprint => Ok(Some(hit)),
            _ => Ok(None),
        }
    }

    async fn build(
        &self,
        key: &BuildKey,
        fingerprint: Fingerprint,
    ) -> Result<SectionContent, SectionBuildError> {
        let facts = self
            .provider
            .fetch_raw_facts(&key.municipality, key.params.as_of)
            .await?;

        let peers = match self.provider.fetch_peer_snapshots(&key.municipality).await {
            Ok(peers) => peers,
            Err(err) => {
                // Ranking is decoration; its absence never fails a build.
                warn!(municipality = %key.municipality, %err, "peer snapshots unavailable, rank omitted");
                Vec::new()
            }
        };

        let derivation = self.deriver.derive(&facts, &peers)?;
        if !derivation.warnings.is_empty() {
            warn!(
                municipality = %key.municipality,
                warnings = derivation.warnings.len(),
                "introduction built from imperfect source data"
            );
        }

        let blocks = ContentAssembler::assemble(&facts, &derivation.metrics, &key.params);
        debug!(
            municipality = %key.municipality,
            fingerprint = fingerprint.short(),
            blocks = blocks.len(),
            "introduction assembled"
        );

        Ok(SectionContent {
            municipality: key.municipality.clone(),
            section: SectionKind::Introduction,
            fingerprint,
            generated_at: Utc::now(),
            blocks,
            warnings: derivation.warnings,
        })
    }

    fn build_slot(&self, key: &BuildKey) -> Arc<AsyncMutex<()>> {
        let mut builds = self.builds.lock().expect("build slot map poisoned");
        builds
            .entry(key.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    fn release_slot(&self, key: &BuildKey, slot: &Arc<AsyncMutex<()>>) {
        let mut builds = self.builds.lock().expect("build slot map poisoned");
        // Drop the map entry once no other caller holds the slot; waiters
        // still hold their own clone and finish against it.
        if let Some(current) = builds.get(key) {
            if Arc::ptr_eq(current, slot) && Arc::strong_count(current) <= 2 {
                builds.remove(key);
            }
        }
    }
}

/// Error raised by a single `get` call. Nothing here is fatal to the
/// process.
#[derive(Debug, thiserror::Error)]
pub enum SectionBuildError {
    #[error(transparent)]
    DataUnavailable(#[from] ProviderError),
    #[error(transparent)]
    InvalidParams(#[from] ParamsError),
    #[error(transparent)]
    MalformedFacts(#[from] MetricError),
    #[error("timed out waiting for the in-flight build to finish")]
    BuildTimeout,
    #[error(transparent)]
    Store(#[from] StoreError),
}
