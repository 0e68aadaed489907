// [apps/orchestrator/tests/retry_flow.rs]
//! Escenario S6 de spec.md §8: `POST /api/strategy/:id/retry` re-clava
//! el snapshot bajo un id nuevo, preserva ubicacion/ciudad/estado/zona
//! horaria, marca `trigger_reason='retry'`, y deja una Strategy Row
//! fresca lista para que los tres runners se programen.

mod support;

use snapcast_infra_db::repositories::{SnapshotRepository, StrategyRepository, TriadJobRepository};
use uuid::Uuid;

#[ignore = "requires DATABASE_URL"]
#[tokio::test]
async fn retry_reseeds_location_and_schedules_a_fresh_strategy_row() {
    let Some(pool) = support::test_pool().await else { return };
    let state = support::test_state(pool.clone());

    let original_id = Uuid::new_v4();
    support::insert_snapshot(&pool, original_id, "Frisco", "America/Chicago").await;

    let outcome = snapcast_orchestrator::services::retry_controller::retry(&state, original_id)
        .await
        .expect("retry succeeds");

    let new_id = outcome.new_snapshot_id;
    assert_ne!(new_id, original_id);

    let snapshot_repo = SnapshotRepository::new(&pool);
    let original = snapshot_repo.find(original_id).await.unwrap();
    let reseeded = snapshot_repo.find(new_id).await.unwrap();

    assert_eq!(reseeded.coordinates.lat, original.coordinates.lat);
    assert_eq!(reseeded.coordinates.lng, original.coordinates.lng);
    assert_eq!(reseeded.resolved_place.city, original.resolved_place.city);
    assert_eq!(reseeded.resolved_place.state, original.resolved_place.state);
    assert_eq!(reseeded.timezone, original.timezone);
    assert_eq!(
        reseeded.trigger_reason,
        snapcast_domain_models::TriggerReason::Retry
    );

    let strategy_repo = StrategyRepository::new(&pool);
    let fresh_row = strategy_repo.find(new_id).await.unwrap();
    assert_eq!(fresh_row.status, snapcast_domain_models::StrategyStatus::Pending);

    let triad_repo = TriadJobRepository::new(&pool);
    assert!(triad_repo.find(new_id).await.unwrap().is_some());

    support::cleanup(&pool, new_id).await;
    support::cleanup(&pool, original_id).await;
}
