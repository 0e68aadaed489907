// [apps/orchestrator/src/handlers/blocks.rs]
/*!
 * APARATO: ADMISION DE BLOQUES
 * RESPONSABILIDAD: `POST /api/blocks` (spec.md §6) — el unico punto de
 * entrada HTTP que atraviesa el pool acotado de C10
 * (`services::limiter::BoundedPool`): la admision en si es la pieza
 * "heavy generation" que spec.md §4.10 describe como el job path de
 * bloques, dado que el generador de venues aguas abajo queda fuera del
 * alcance de este sistema (spec.md §1). Ver DESIGN.md para esta
 * decision de diseño.
 */

use crate::errors::OrchestratorError;
use crate::handlers::resolve_idempotency_key;
use crate::services::admission;
use crate::state::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use snapcast_domain_models::TriggerReason;
use snapcast_infra_db::repositories::BlockRankingRepository;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct BlocksRequest {
    #[serde(rename = "snapshotId")]
    pub snapshot_id: String,
}

pub async fn create_blocks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<BlocksRequest>,
) -> Result<impl IntoResponse, OrchestratorError> {
    let raw_body = json!({ "snapshotId": &body.snapshot_id }).to_string();
    let idempotency_header = headers
        .get("Idempotency-Key")
        .and_then(|value| value.to_str().ok());
    let idempotency_key = resolve_idempotency_key(idempotency_header, "/api/blocks", &raw_body);

    if let Some(memoized) = state.idempotency.get(&idempotency_key).await {
        return Ok(replay(memoized));
    }

    let snapshot_id = Uuid::parse_str(&body.snapshot_id)
        .map_err(|_| OrchestratorError::BadSnapshotId(body.snapshot_id.clone()))?;

    let outcome = state
        .blocks_pool
        .run(admission::admit(&state, snapshot_id, TriggerReason::Initial, None))
        .await
        .map_err(|err| OrchestratorError::EnqueueFailed(err.to_string()))??;

    let response = if outcome.admitted {
        let block_repo = BlockRankingRepository::new(&state.pool);
        block_repo
            .record(snapshot_id)
            .await
            .map_err(|err| OrchestratorError::EnqueueFailed(err.to_string()))?;

        json!({
            "ok": true,
            "status": "queued",
            "snapshotId": snapshot_id,
            "kicked": outcome.kicked,
        })
    } else {
        json!({
            "ok": true,
            "status": outcome.status,
            "snapshotId": snapshot_id,
        })
    };

    state.idempotency.put(idempotency_key, response.clone()).await;
    Ok(raw_json(response, if outcome.admitted { StatusCode::ACCEPTED } else { StatusCode::OK }))
}

fn replay(memoized: Value) -> axum::response::Response {
    raw_json(memoized, StatusCode::OK)
}

fn raw_json(body: Value, status: StatusCode) -> axum::response::Response {
    (status, Json(body)).into_response()
}
