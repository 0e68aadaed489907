// [apps/orchestrator/src/services/holiday.rs]
/*!
 * APARATO: RUNNER DE VERIFICACION DE FERIADOS (C2c)
 * RESPONSABILIDAD: Clasificacion corta y de baja latencia —
 * nombre de feriado o `none` — acotada a un presupuesto de ~5s de
 * reloj (spec.md §4.2). No fatal: un fallo deja la columna nula y la
 * tuberia continua.
 */

use crate::state::AppState;
use snapcast_domain_models::{DispatchOutcome, DispatchRequest, Role, Snapshot};
use snapcast_infra_db::repositories::{SnapshotRepository, StrategyRepository};
use std::time::Duration;
use tracing::{info, warn};

const HOLIDAY_WALL_CLOCK_BUDGET: Duration = Duration::from_secs(5);

const SYSTEM_PROMPT: &str = "Responde unicamente con el nombre del feriado observado en la fecha \
dada, o la palabra 'none' si no hay ninguno. Sin explicaciones.";

/// Ejecuta el runner de feriados para `snapshot_id`. Un vencimiento del
/// presupuesto o un fallo del proveedor deja la columna sin tocar — la
/// ausencia de feriado nunca es distinguible de "no verificado" por
/// diseño (spec.md §4.2).
#[tracing::instrument(skip(state))]
pub async fn run_holiday_check(state: AppState, snapshot: Snapshot) {
    let snapshot = &snapshot;
    let state = &state;
    let request = DispatchRequest {
        role: Role::Holiday,
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_prompt: format!(
            "Fecha local: {} ({})",
            snapshot.local_date(),
            snapshot.day_of_week
        ),
        expects_json: false,
    };

    let dispatch_future = state.dispatcher.dispatch(request);
    let outcome = match tokio::time::timeout(HOLIDAY_WALL_CLOCK_BUDGET, dispatch_future).await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(snapshot_id = %snapshot.snapshot_id, "⏱️ [HOLIDAY]: exceeded 5s budget, leaving column unset");
            return;
        }
    };

    let holiday_name = match outcome {
        DispatchOutcome::Success { text, .. } => text.trim().to_string(),
        DispatchOutcome::Failure { error, .. } => {
            warn!(snapshot_id = %snapshot.snapshot_id, %error, "⚠️ [HOLIDAY]: provider call failed, column left unset");
            return;
        }
    };

    if holiday_name.eq_ignore_ascii_case("none") || holiday_name.is_empty() {
        return;
    }

    let snapshot_repo = SnapshotRepository::new(&state.pool);
    let strategy_repo = StrategyRepository::new(&state.pool);

    if let Err(err) = snapshot_repo
        .patch_holiday(snapshot.snapshot_id, Some(&holiday_name), true)
        .await
    {
        warn!(snapshot_id = %snapshot.snapshot_id, error = %err, "⚠️ [HOLIDAY]: failed to patch snapshot");
        return;
    }

    if let Err(err) = strategy_repo
        .patch_holiday(snapshot.snapshot_id, &holiday_name)
        .await
    {
        warn!(snapshot_id = %snapshot.snapshot_id, error = %err, "⚠️ [HOLIDAY]: failed to patch strategy row");
        return;
    }

    info!(snapshot_id = %snapshot.snapshot_id, holiday = %holiday_name, "🎉 [HOLIDAY]: patched");
}
