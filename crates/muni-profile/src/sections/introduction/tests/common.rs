use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};

use crate::sections::introduction::domain::{
    MunicipalityId, MunicipalityKind, PeerSnapshot, PriorCensus, RawFacts, SourceVersion,
    WardFacts,
};
use crate::sections::introduction::manager::IntroductionManager;
use crate::sections::introduction::metrics::MetricsPolicy;
use crate::sections::introduction::provider::{FactProvider, ProviderError};
use crate::sections::introduction::store::InMemoryContentStore;

/// Provider double serving one municipality from memory, with counters so
/// tests can assert how often the expensive fetch actually ran.
pub(super) struct StaticProvider {
    facts: Mutex<RawFacts>,
    revision: Mutex<String>,
    peers: Vec<PeerSnapshot>,
    fact_fetches: AtomicUsize,
    version_fetches: AtomicUsize,
    fetch_delay: Option<Duration>,
}

impl StaticProvider {
    pub(super) fn new(facts: RawFacts) -> Self {
        Self {
            facts: Mutex::new(facts),
            revision: Mutex::new("rev-1".to_string()),
            peers: Vec::new(),
            fact_fetches: AtomicUsize::new(0),
            version_fetches: AtomicUsize::new(0),
            fetch_delay: None,
        }
    }

    pub(super) fn with_peers(mut self, peers: Vec<PeerSnapshot>) -> Self {
        self.peers = peers;
        self
    }

    pub(super) fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    /// Simulate an upstream data refresh: new revision, new facts.
    pub(super) fn publish(&self, revision: &str, facts: RawFacts) {
        *self.revision.lock().expect("revision lock") = revision.to_string();
        *self.facts.lock().expect("facts lock") = facts;
    }

    pub(super) fn fact_fetches(&self) -> usize {
        self.fact_fetches.load(Ordering::SeqCst)
    }

    pub(super) fn version_fetches(&self) -> usize {
        self.version_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FactProvider for StaticProvider {
    async fn fetch_raw_facts(
        &self,
        id: &MunicipalityId,
        _as_of: Option<NaiveDate>,
    ) -> Result<RawFacts, ProviderError> {
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.fact_fetches.fetch_add(1, Ordering::SeqCst);
        let facts = self.facts.lock().expect("facts lock").clone();
        if facts.municipality != *id {
            return Err(ProviderError::UnknownMunicipality(id.clone()));
        }
        Ok(facts)
    }

    async fn fetch_source_version(
        &self,
        id: &MunicipalityId,
    ) -> Result<SourceVersion, ProviderError> {
        self.version_fetches.fetch_add(1, Ordering::SeqCst);
        let facts = self.facts.lock().expect("facts lock");
        if facts.municipality != *id {
            return Err(ProviderError::UnknownMunicipality(id.clone()));
        }
        Ok(SourceVersion {
            dataset_revision: self.revision.lock().expect("revision lock").clone(),
            updated_at: Utc
                .with_ymd_and_hms(2023, 6, 1, 8, 30, 0)
                .single()
                .expect("valid timestamp"),
            earliest_record: NaiveDate::from_ymd_opt(2011, 1, 1).expect("valid date"),
        })
    }

    async fn fetch_peer_snapshots(
        &self,
        _id: &MunicipalityId,
    ) -> Result<Vec<PeerSnapshot>, ProviderError> {
        Ok(self.peers.clone())
    }
}

pub(super) fn duduwa_id() -> MunicipalityId {
    MunicipalityId("duduwa".to_string())
}

pub(super) fn duduwa_facts() -> RawFacts {
    RawFacts {
        municipality: duduwa_id(),
        name: "Duduwa".to_string(),
        name_local: Some("डुडुवा".to_string()),
        kind: MunicipalityKind::RuralMunicipality,
        district: "Banke".to_string(),
        district_local: Some("बाँके".to_string()),
        province: "Lumbini".to_string(),
        province_local: Some("लुम्बिनी".to_string()),
        area_sq_km: 45.3,
        census_year: 2021,
        population_total: None,
        wards: vec![
            WardFacts {
                number: 1,
                population: 1200,
                households: Some(260),
                area_sq_km: Some(24.1),
            },
            WardFacts {
                number: 2,
                population: 900,
                households: Some(210),
                area_sq_km: Some(21.2),
            },
        ],
        prior_census: Some(PriorCensus {
            year: 2011,
            population: 1800,
        }),
    }
}

pub(super) fn banke_peers() -> Vec<PeerSnapshot> {
    vec![
        PeerSnapshot {
            municipality: MunicipalityId("nepalgunj".to_string()),
            name: "Nepalgunj".to_string(),
            population: 138_951,
        },
        PeerSnapshot {
            municipality: MunicipalityId("kohalpur".to_string()),
            name: "Kohalpur".to_string(),
            population: 77_000,
        },
        PeerSnapshot {
            municipality: MunicipalityId("janaki".to_string()),
            name: "Janaki".to_string(),
            population: 1_500,
        },
    ]
}

pub(super) type TestManager = IntroductionManager<StaticProvider, InMemoryContentStore>;

pub(super) fn build_manager(
    provider: StaticProvider,
) -> (Arc<TestManager>, Arc<StaticProvider>, Arc<InMemoryContentStore>) {
    let provider = Arc::new(provider);
    let store = Arc::new(InMemoryContentStore::default());
    let manager = Arc::new(IntroductionManager::new(
        provider.clone(),
        store.clone(),
        MetricsPolicy::default(),
    ));
    (manager, provider, store)
}
