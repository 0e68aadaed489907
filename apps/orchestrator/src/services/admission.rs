// [apps/orchestrator/src/services/admission.rs]
/*!
 * APARATO: ORQUESTADOR DE TUBERIA (C4)
 * RESPONSABILIDAD: Punto de entrada unico de admision — garantiza la
 * fila de estrategia, deduplica solicitudes repetidas via el Triad Job
 * y la cache de idempotencia, y dispara los tres runners C2 como
 * tareas independientes sin bloquear la respuesta (spec.md §4.4).
 */

use crate::state::AppState;
use serde::Serialize;
use snapcast_domain_models::{Snapshot, TriggerReason};
use snapcast_infra_db::repositories::{SnapshotRepository, StrategyRepository, TriadJobRepository};
use snapcast_infra_db::DbError;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct AdmissionResult {
    pub admitted: bool,
    pub status: String,
    pub kicked: Vec<&'static str>,
}

/// Ejecuta los pasos 1-6 de spec.md §4.4. El llamador HTTP ya resolvio
/// la clave de idempotencia (paso 2) antes de invocar esta funcion —
/// ver `handlers::blocks`/`handlers::strategy`.
pub async fn admit(
    state: &AppState,
    snapshot_id: Uuid,
    trigger_reason: TriggerReason,
    user_id: Option<Uuid>,
) -> Result<AdmissionResult, DbError> {
    let snapshot_repo = SnapshotRepository::new(&state.pool);
    let snapshot = snapshot_repo.find(snapshot_id).await?;

    let strategy_repo = StrategyRepository::new(&state.pool);
    strategy_repo
        .ensure_pending(snapshot_id, trigger_reason, user_id)
        .await?;

    let triad_repo = TriadJobRepository::new(&state.pool);
    let first_admission = triad_repo.try_admit(snapshot_id, "strategy").await?;

    if !first_admission {
        info!(%snapshot_id, "🔁 [ADMISSION]: triad job already queued, no new tasks scheduled");
        let existing = strategy_repo.find(snapshot_id).await?;
        return Ok(AdmissionResult {
            admitted: false,
            status: existing.status.as_db_str().to_string(),
            kicked: Vec::new(),
        });
    }

    spawn_runners(state, &snapshot);

    info!(%snapshot_id, "🚀 [ADMISSION]: admitted, three runners scheduled");
    Ok(AdmissionResult {
        admitted: true,
        status: "pending".to_string(),
        kicked: vec!["holiday", "minstrategy", "briefing"],
    })
}

/// Programa C2c, C2a, C2b como tareas separadas — en ese orden de
/// despacho para que el feriado, visible en la UI, aterrice primero
/// (spec.md §4.4, nota de ordenamiento). El fallo de cualquiera no
/// cancela a las demas: cada tarea contiene sus propios errores.
fn spawn_runners(state: &AppState, snapshot: &Snapshot) {
    let holiday_state = state.clone();
    let holiday_snapshot = snapshot.clone();
    tokio::spawn(async move {
        crate::services::holiday::run_holiday_check(holiday_state, holiday_snapshot).await;
    });

    let strategist_state = state.clone();
    let strategist_snapshot = snapshot.clone();
    tokio::spawn(async move {
        crate::services::strategist::run_min_strategy(strategist_state, strategist_snapshot).await;
    });

    let briefer_state = state.clone();
    let briefer_snapshot = snapshot.clone();
    tokio::spawn(async move {
        crate::services::briefer::run_briefing(briefer_state, briefer_snapshot).await;
    });
}
