// [apps/orchestrator/src/handlers/strategy.rs]
/*!
 * APARATO: CONSULTA Y CONTROL DE LA TUBERIA DE ESTRATEGIA
 * RESPONSABILIDAD: El grueso de la superficie HTTP de spec.md §6 — dos
 * puntos de entrada mutantes que comparten la admision de C4
 * (`seed`, `run`), dos lecturas de proyeccion (`get`, `briefing`), el
 * reintento de C9, y el historial por usuario.
 */

use crate::errors::OrchestratorError;
use crate::services::{admission, retry_controller};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use snapcast_domain_models::TriggerReason;
use snapcast_infra_db::repositories::{BriefingRepository, StrategyRepository};
use snapcast_infra_db::DbError;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SeedRequest {
    pub snapshot_id: Uuid,
}

/// `POST /api/strategy/seed` — garantiza la Strategy Row sin disparar
/// los runners de C2; distinto de `run`, que admite de lleno (spec.md
/// §6).
pub async fn seed(
    State(state): State<AppState>,
    Json(body): Json<SeedRequest>,
) -> Result<impl IntoResponse, OrchestratorError> {
    let strategy_repo = StrategyRepository::new(&state.pool);
    strategy_repo
        .ensure_pending(body.snapshot_id, TriggerReason::Initial, None)
        .await?;

    Ok(Json(json!({ "ok": true, "snapshot_id": body.snapshot_id })))
}

/// `POST /api/strategy/run/:snapshotId` — admision completa (spec.md
/// §4.4 via §6). La respuesta siempre reporta `status:'pending'`
/// textualmente, como especifica el contrato HTTP, aun cuando la
/// admision sea una repeticion sin runners nuevos.
pub async fn run(
    State(state): State<AppState>,
    Path(snapshot_id): Path<String>,
) -> Result<impl IntoResponse, OrchestratorError> {
    let snapshot_id =
        Uuid::parse_str(&snapshot_id).map_err(|_| OrchestratorError::BadSnapshotId(snapshot_id))?;

    let outcome = admission::admit(&state, snapshot_id, TriggerReason::Initial, None).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "status": "pending",
            "snapshot_id": snapshot_id,
            "kicked": outcome.kicked,
        })),
    ))
}

/// `GET /api/strategy/:snapshotId` — proyeccion completa del estado
/// del pipeline, incluyendo el arreglo `waitFor` (spec.md §7, ultima
/// frase).
pub async fn get(
    State(state): State<AppState>,
    Path(snapshot_id): Path<String>,
) -> Result<impl IntoResponse, OrchestratorError> {
    let snapshot_id =
        Uuid::parse_str(&snapshot_id).map_err(|_| OrchestratorError::BadSnapshotId(snapshot_id))?;

    let strategy_repo = StrategyRepository::new(&state.pool);
    let row = match strategy_repo.find(snapshot_id).await {
        Ok(row) => row,
        Err(DbError::NotFound) => return Err(OrchestratorError::NotFound),
        Err(err) => return Err(err.into()),
    };

    let briefing_repo = BriefingRepository::new(&state.pool);
    let briefing = briefing_repo.find(snapshot_id).await?;
    let briefing_present = briefing.as_ref().is_some_and(|b| !b.is_empty_stub());

    let wait_for = row.wait_for(briefing_present);
    let time_elapsed_ms = (chrono::Utc::now() - row.created_at).num_milliseconds().max(0);

    Ok(Json(json!({
        "status": row.status.as_db_str(),
        "snapshot_id": row.snapshot_id,
        "min": row.minstrategy,
        "briefing": briefing,
        "consolidated": row.consolidated_strategy,
        "waitFor": wait_for,
        "timeElapsedMs": time_elapsed_ms,
    })))
}

/// `GET /api/strategy/briefing/:snapshotId` — proyeccion exclusiva de
/// la Briefing Row.
pub async fn briefing(
    State(state): State<AppState>,
    Path(snapshot_id): Path<String>,
) -> Result<impl IntoResponse, OrchestratorError> {
    let snapshot_id =
        Uuid::parse_str(&snapshot_id).map_err(|_| OrchestratorError::BadSnapshotId(snapshot_id))?;

    let briefing_repo = BriefingRepository::new(&state.pool);
    let row = briefing_repo.find(snapshot_id).await?.ok_or(OrchestratorError::NotFound)?;

    Ok(Json(row))
}

/// `POST /api/strategy/:snapshotId/retry` — delega en el Controlador
/// de Reintento (C9).
pub async fn retry(
    State(state): State<AppState>,
    Path(snapshot_id): Path<String>,
) -> Result<impl IntoResponse, OrchestratorError> {
    let original_snapshot_id =
        Uuid::parse_str(&snapshot_id).map_err(|_| OrchestratorError::BadSnapshotId(snapshot_id))?;

    let outcome = retry_controller::retry(&state, original_snapshot_id)
        .await
        .map_err(|err| OrchestratorError::EnqueueFailed(err.to_string()))?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "ok": true,
            "new_snapshot_id": outcome.new_snapshot_id,
            "original_snapshot_id": original_snapshot_id,
            "status": "pending",
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user_id: Uuid,
}

/// `GET /api/strategy/history?user_id=…`.
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, OrchestratorError> {
    let strategy_repo = StrategyRepository::new(&state.pool);
    let attempts = strategy_repo.history_for_user(query.user_id).await?;

    let attempts: Vec<_> = attempts
        .into_iter()
        .map(|entry| {
            json!({
                "snapshot_id": entry.snapshot_id,
                "status": entry.status.as_db_str(),
                "created_at": entry.created_at,
                "updated_at": entry.updated_at,
            })
        })
        .collect();

    Ok(Json(json!({ "ok": true, "attempts": attempts })))
}
