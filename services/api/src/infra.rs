use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;

use muni_profile::config::SectionConfig;
use muni_profile::sections::introduction::{
    FactProvider, InMemoryContentStore, IntroductionManager, MetricsPolicy, MunicipalityId,
    MunicipalityKind, PeerSnapshot, PriorCensus, ProviderError, RawFacts, SourceVersion, WardFacts,
};
use muni_profile::sources::census::normalize_identifier;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type IntroManager = IntroductionManager<CensusDirectory, InMemoryContentStore>;

/// Process-wide section manager, constructed once on first use. Concurrent
/// first callers race the `OnceLock`, never the construction side effects:
/// losers drop their candidate and share the winner's instance.
pub(crate) fn introduction_manager(
    directory: CensusDirectory,
    config: &SectionConfig,
) -> Arc<IntroManager> {
    static MANAGER: OnceLock<Arc<IntroManager>> = OnceLock::new();
    MANAGER
        .get_or_init(|| Arc::new(build_introduction_manager(directory, config)))
        .clone()
}

/// Fresh, unshared manager for CLI one-shots and tests.
pub(crate) fn build_introduction_manager(
    directory: CensusDirectory,
    config: &SectionConfig,
) -> IntroManager {
    IntroductionManager::new(
        Arc::new(directory),
        Arc::new(InMemoryContentStore::new(config.cache_capacity)),
        MetricsPolicy::default(),
    )
    .with_build_timeout(config.build_timeout)
}

struct DirectoryEntry {
    revision: String,
    facts: RawFacts,
}

/// In-memory census directory standing in for the district data store.
/// Seeded with the Banke district local units the demo ships with; ward
/// slices can be replaced from a census CSV export before the directory
/// is handed to the manager.
pub(crate) struct CensusDirectory {
    entries: HashMap<MunicipalityId, DirectoryEntry>,
}

impl CensusDirectory {
    pub(crate) fn seeded() -> Self {
        let mut entries = HashMap::new();
        for facts in seed_municipalities() {
            entries.insert(
                facts.municipality.clone(),
                DirectoryEntry {
                    revision: "census-2021-r1".to_string(),
                    facts,
                },
            );
        }
        Self { entries }
    }

    pub(crate) fn municipality_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .keys()
            .map(|id| id.0.clone())
            .collect();
        names.sort();
        names
    }

    /// Swap in ward data imported from a census export and bump the
    /// revision so previously cached sections are rebuilt.
    pub(crate) fn replace_wards(&mut self, id: &MunicipalityId, wards: Vec<WardFacts>) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.facts.wards = wards;
                entry.facts.population_total = None;
                entry.revision = format!("{}-local-import", entry.revision);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl FactProvider for CensusDirectory {
    async fn fetch_raw_facts(
        &self,
        id: &MunicipalityId,
        _as_of: Option<NaiveDate>,
    ) -> Result<RawFacts, ProviderError> {
        self.entries
            .get(id)
            .map(|entry| entry.facts.clone())
            .ok_or_else(|| ProviderError::UnknownMunicipality(id.clone()))
    }

    async fn fetch_source_version(
        &self,
        id: &MunicipalityId,
    ) -> Result<SourceVersion, ProviderError> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| ProviderError::UnknownMunicipality(id.clone()))?;
        Ok(SourceVersion {
            dataset_revision: entry.revision.clone(),
            updated_at: Utc
                .with_ymd_and_hms(2023, 6, 1, 8, 30, 0)
                .single()
                .expect("static census timestamp"),
            earliest_record: NaiveDate::from_ymd_opt(2011, 6, 22).expect("2011 census date"),
        })
    }

    async fn fetch_peer_snapshots(
        &self,
        id: &MunicipalityId,
    ) -> Result<Vec<PeerSnapshot>, ProviderError> {
        let district = self
            .entries
            .get(id)
            .map(|entry| entry.facts.district.clone())
            .ok_or_else(|| ProviderError::UnknownMunicipality(id.clone()))?;

        Ok(self
            .entries
            .values()
            .filter(|entry| {
                entry.facts.district == district && entry.facts.municipality != *id
            })
            .map(|entry| PeerSnapshot {
                municipality: entry.facts.municipality.clone(),
                name: entry.facts.name.clone(),
                population: entry
                    .facts
                    .population_total
                    .unwrap_or_else(|| entry.facts.wards.iter().map(|w| w.population).sum()),
            })
            .collect())
    }
}

pub(crate) fn municipality_id(raw: &str) -> MunicipalityId {
    MunicipalityId(normalize_identifier(raw))
}

fn seed_municipalities() -> Vec<RawFacts> {
    vec![
        banke_unit(
            "duduwa",
            "Duduwa",
            "डुडुवा",
            MunicipalityKind::RuralMunicipality,
            112.2,
            &[
                (1, 4890, 905),
                (2, 5102, 948),
                (3, 4477, 821),
                (4, 5260, 1003),
                (5, 4043, 761),
                (6, 4830, 889),
                (7, 5315, 986),
                (8, 4605, 853),
            ],
            Some(PriorCensus {
                year: 2011,
                population: 34_632,
            }),
        ),
        banke_unit(
            "janaki",
            "Janaki",
            "जानकी",
            MunicipalityKind::RuralMunicipality,
            92.4,
            &[
                (1, 5230, 972),
                (2, 4811, 893),
                (3, 5644, 1048),
                (4, 5105, 941),
                (5, 4970, 915),
                (6, 5389, 1002),
            ],
            Some(PriorCensus {
                year: 2011,
                population: 28_905,
            }),
        ),
        banke_unit(
            "khajura",
            "Khajura",
            "खजुरा",
            MunicipalityKind::RuralMunicipality,
            109.2,
            &[
                (1, 6520, 1214),
                (2, 6108, 1130),
                (3, 6893, 1276),
                (4, 6347, 1179),
                (5, 6701, 1243),
                (6, 6014, 1118),
                (7, 6455, 1197),
                (8, 6229, 1154),
            ],
            Some(PriorCensus {
                year: 2011,
                population: 45_108,
            }),
        ),
        banke_unit(
            "narainapur",
            "Narainapur",
            "नरैनापुर",
            MunicipalityKind::RuralMunicipality,
            106.9,
            &[
                (1, 5877, 1021),
                (2, 6240, 1089),
                (3, 5512, 957),
                (4, 6038, 1054),
                (5, 5790, 1008),
                (6, 6125, 1066),
            ],
            None,
        ),
    ]
}

fn banke_unit(
    id: &str,
    name: &str,
    name_local: &str,
    kind: MunicipalityKind,
    area_sq_km: f64,
    wards: &[(u16, u64, u64)],
    prior_census: Option<PriorCensus>,
) -> RawFacts {
    RawFacts {
        municipality: MunicipalityId(id.to_string()),
        name: name.to_string(),
        name_local: Some(name_local.to_string()),
        kind,
        district: "Banke".to_string(),
        district_local: Some("बाँके".to_string()),
        province: "Lumbini".to_string(),
        province_local: Some("लुम्बिनी".to_string()),
        area_sq_km,
        census_year: 2021,
        population_total: None,
        wards: wards
            .iter()
            .map(|&(number, population, households)| WardFacts {
                number,
                population,
                households: Some(households),
                area_sq_km: None,
            })
            .collect(),
        prior_census,
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
