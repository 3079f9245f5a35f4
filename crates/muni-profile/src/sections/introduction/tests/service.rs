use std::time::Duration;

use chrono::NaiveDate;

use super::common::{build_manager, duduwa_facts, duduwa_id, StaticProvider};
use crate::sections::introduction::domain::{
    DataQualityWarning, MunicipalityId, SectionParams,
};
use crate::sections::introduction::manager::SectionBuildError;
use crate::sections::introduction::provider::ProviderError;
use crate::sections::SectionKind;

#[tokio::test]
async fn sequential_calls_return_identical_content() {
    let (manager, provider, _) = build_manager(StaticProvider::new(duduwa_facts()));

    let first = manager
        .get(&duduwa_id(), SectionParams::default())
        .await
        .expect("first build");
    let second = manager
        .get(&duduwa_id(), SectionParams::default())
        .await
        .expect("second call");

    assert_eq!(first, second);
    assert_eq!(first.section, SectionKind::Introduction);
    // The second call was served from the store: one expensive fetch, two
    // cheap metadata calls.
    assert_eq!(provider.fact_fetches(), 1);
    assert_eq!(provider.version_fetches(), 2);
}

#[tokio::test]
async fn distinct_params_build_distinct_entries() {
    let (manager, provider, _) = build_manager(StaticProvider::new(duduwa_facts()));

    let with_chart = manager
        .get(&duduwa_id(), SectionParams::default())
        .await
        .expect("chart build");
    let without_chart = manager
        .get(
            &duduwa_id(),
            SectionParams {
                include_chart: false,
                ..SectionParams::default()
            },
        )
        .await
        .expect("chartless build");

    assert!(with_chart.has_chart());
    assert!(!without_chart.has_chart());
    assert_ne!(with_chart.fingerprint, without_chart.fingerprint);
    assert_eq!(provider.fact_fetches(), 2);
}

#[tokio::test]
async fn source_refresh_invalidates_cached_entry() {
    let (manager, provider, _) = build_manager(StaticProvider::new(duduwa_facts()));

    let stale = manager
        .get(&duduwa_id(), SectionParams::default())
        .await
        .expect("initial build");

    let mut updated = duduwa_facts();
    updated.wards[1].population = 950;
    provider.publish("rev-2", updated);

    let fresh = manager
        .get(&duduwa_id(), SectionParams::default())
        .await
        .expect("rebuild");

    assert_ne!(stale.fingerprint, fresh.fingerprint);
    assert_ne!(stale.blocks, fresh.blocks);
    assert_eq!(provider.fact_fetches(), 2);
}

#[tokio::test]
async fn explicit_invalidate_forces_rebuild() {
    let (manager, provider, _) = build_manager(StaticProvider::new(duduwa_facts()));

    manager
        .get(&duduwa_id(), SectionParams::default())
        .await
        .expect("initial build");
    manager
        .invalidate(&duduwa_id(), SectionParams::default())
        .expect("invalidate");
    manager
        .get(&duduwa_id(), SectionParams::default())
        .await
        .expect("rebuild");

    assert_eq!(provider.fact_fetches(), 2);
}

#[tokio::test]
async fn degraded_source_data_yields_content_with_warning() {
    let mut facts = duduwa_facts();
    facts.population_total = Some(3000);
    let (manager, _, _) = build_manager(StaticProvider::new(facts));

    let content = manager
        .get(&duduwa_id(), SectionParams::default())
        .await
        .expect("degraded build still succeeds");

    assert!(!content.blocks.is_empty());
    assert!(matches!(
        content.warnings.as_slice(),
        [DataQualityWarning::WardTotalMismatch { .. }]
    ));
}

#[tokio::test]
async fn unknown_municipality_is_data_unavailable() {
    let (manager, _, _) = build_manager(StaticProvider::new(duduwa_facts()));

    let result = manager
        .get(
            &MunicipalityId("narainapur".to_string()),
            SectionParams::default(),
        )
        .await;

    match result {
        Err(SectionBuildError::DataUnavailable(ProviderError::UnknownMunicipality(id))) => {
            assert_eq!(id.0, "narainapur");
        }
        other => panic!("expected unknown municipality, got {other:?}"),
    }
}

#[tokio::test]
async fn as_of_before_records_is_rejected_without_a_fetch() {
    let (manager, provider, _) = build_manager(StaticProvider::new(duduwa_facts()));

    let result = manager
        .get(
            &duduwa_id(),
            SectionParams {
                as_of: Some(NaiveDate::from_ymd_opt(1995, 4, 13).expect("valid date")),
                ..SectionParams::default()
            },
        )
        .await;

    assert!(matches!(result, Err(SectionBuildError::InvalidParams(_))));
    assert_eq!(provider.fact_fetches(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_build_times_out_waiting_callers() {
    use crate::sections::introduction::manager::IntroductionManager;
    use crate::sections::introduction::metrics::MetricsPolicy;
    use crate::sections::introduction::store::InMemoryContentStore;
    use std::sync::Arc;

    let provider = Arc::new(
        StaticProvider::new(duduwa_facts()).with_fetch_delay(Duration::from_secs(2)),
    );
    let store = Arc::new(InMemoryContentStore::default());
    let manager = Arc::new(
        IntroductionManager::new(provider, store, MetricsPolicy::default())
            .with_build_timeout(Duration::from_millis(50)),
    );

    let slow = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.get(&duduwa_id(), SectionParams::default()).await })
    };

    // Let the slow build claim the per-key lock first.
    tokio::time::sleep(Duration::from_millis(20)).await;

    let waiter = manager.get(&duduwa_id(), SectionParams::default()).await;
    assert!(matches!(waiter, Err(SectionBuildError::BuildTimeout)));

    let built = slow.await.expect("join").expect("slow build completes");
    assert_eq!(built.municipality, duduwa_id());
}
