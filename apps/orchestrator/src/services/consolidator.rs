// [apps/orchestrator/src/services/consolidator.rs]
/*!
 * APARATO: CONSOLIDADOR (C6)
 * RESPONSABILIDAD: Fusionar la salida del Estratega y del Briefer en
 * una unica `consolidated_strategy`, protegido por el candado de
 * asesoria cruzado-entre-procesos derivado del snapshot id
 * (spec.md §4.6). Exactamente un intento de consolidacion procede por
 * snapshot a la vez, sin importar cuantos procesos observen la misma
 * notificacion (invariante testeable #2, SPEC_FULL.md §8).
 */

use crate::state::AppState;
use snapcast_domain_models::{DispatchOutcome, DispatchRequest, Role, StrategyStatus};
use snapcast_infra_db::repositories::{BriefingRepository, StrategyRepository};
use snapcast_infra_db::{AdvisoryLock, DbError};
use tracing::{error, info, warn};
use uuid::Uuid;

const CONSOLIDATOR_SYSTEM_PROMPT: &str = "Eres un editor que combina la evaluacion tactica de un \
estratega con el briefing de inteligencia de un analista en una unica recomendacion coherente de 2 a \
4 frases para un conductor de rideshare. No inventes datos que no esten en las entradas.";

/// `maybeConsolidate(snapshot_id)` — invocado por el Oyente de Cambios
/// (C5) tras cada notificacion de `strategy_progress`/`strategy_ready`.
/// Silenciosamente no hace nada cuando el precondicion de candidatura
/// no se cumple o el candado ya esta tomado — ninguno de esos casos es
/// un error (spec.md §7, taxonomia `Contention`).
pub async fn maybe_consolidate(state: &AppState, snapshot_id: Uuid) {
    let strategy_repo = StrategyRepository::new(&state.pool);

    let row = match strategy_repo.find(snapshot_id).await {
        Ok(row) => row,
        Err(DbError::NotFound) => return,
        Err(err) => {
            warn!(%snapshot_id, error = %err, "⚠️ [CONSOLIDATOR]: failed to read strategy row");
            return;
        }
    };

    let strategist_output = row.minstrategy.as_deref().unwrap_or("").trim().to_string();

    let briefing_repo = BriefingRepository::new(&state.pool);
    let briefing = match briefing_repo.find(snapshot_id).await {
        Ok(briefing) => briefing,
        Err(err) => {
            warn!(%snapshot_id, error = %err, "⚠️ [CONSOLIDATOR]: failed to read briefing row");
            return;
        }
    };
    let briefer_output = briefing
        .filter(|b| !b.is_empty_stub())
        .map(|b| b.role_pure_serialization());

    if strategist_output.is_empty() || briefer_output.is_none() {
        if let Err(err) = strategy_repo.mark_waiting_on_roles(snapshot_id).await {
            warn!(%snapshot_id, error = %err, "⚠️ [CONSOLIDATOR]: failed to mark waiting on roles");
        }
        return;
    }
    let briefer_output = briefer_output.expect("checked non-None above");

    if row
        .consolidated_strategy
        .as_deref()
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false)
    {
        return;
    }

    let mut lock = AdvisoryLock::new(&state.pool, snapshot_id);
    let acquired = match lock.try_acquire().await {
        Ok(acquired) => acquired,
        Err(err) => {
            warn!(%snapshot_id, error = %err, "⚠️ [CONSOLIDATOR]: advisory lock acquisition errored");
            return;
        }
    };

    if !acquired {
        info!(%snapshot_id, "🔒 [CONSOLIDATOR]: lock held by another worker, skipping");
        return;
    }

    let outcome = consolidate_locked(state, &strategy_repo, snapshot_id, &strategist_output, &briefer_output, &row).await;

    if let Err(err) = lock.release().await {
        warn!(%snapshot_id, error = %err, "⚠️ [CONSOLIDATOR]: failed to release advisory lock");
    }

    if let Err(err) = outcome {
        warn!(%snapshot_id, error = %err, "🔥 [CONSOLIDATOR]: consolidation attempt failed");
        let _ = strategy_repo
            .write_consolidation(snapshot_id, None, StrategyStatus::Failed, Some(&err.to_string()))
            .await;
    }
}

async fn consolidate_locked(
    state: &AppState,
    strategy_repo: &StrategyRepository<'_>,
    snapshot_id: Uuid,
    strategist_output: &str,
    briefer_output: &str,
    row: &snapcast_domain_models::StrategyRow,
) -> Result<(), DbError> {
    let user_prompt = format!(
        "Direccion del usuario: {}\n\nEstratega:\n{strategist_output}\n\nBriefing:\n{briefer_output}",
        row.user_resolved_address.as_deref().unwrap_or("desconocida"),
    );

    let request = DispatchRequest {
        role: Role::Consolidator,
        system_prompt: CONSOLIDATOR_SYSTEM_PROMPT.to_string(),
        user_prompt,
        expects_json: false,
    };

    let outcome = state.dispatcher.dispatch(request).await;

    match outcome {
        DispatchOutcome::Success { text, .. } if !text.trim().is_empty() => {
            strategy_repo
                .write_consolidation(snapshot_id, Some(text.trim()), StrategyStatus::Ok, None)
                .await?;
            info!(%snapshot_id, "✅ [CONSOLIDATOR]: consolidated strategy persisted");
            Ok(())
        }
        DispatchOutcome::Success { .. } => {
            degrade_to_strategist_only(strategy_repo, snapshot_id, strategist_output).await
        }
        DispatchOutcome::Failure { error: message, .. } => {
            error!(%snapshot_id, error = %message, "⚠️ [CONSOLIDATOR]: call failed, degrading to strategist-only");
            degrade_to_strategist_only(strategy_repo, snapshot_id, strategist_output).await
        }
    }
}

/// Degradacion documentada por spec.md §4.6 paso 8: cuando el
/// consolidador no produce salida util, la UI se desbloquea con el
/// texto del estratega como consolidado.
async fn degrade_to_strategist_only(
    strategy_repo: &StrategyRepository<'_>,
    snapshot_id: Uuid,
    strategist_output: &str,
) -> Result<(), DbError> {
    strategy_repo
        .write_consolidation(snapshot_id, Some(strategist_output), StrategyStatus::Ok, None)
        .await?;
    info!(%snapshot_id, "🩹 [CONSOLIDATOR]: degraded to strategist-only output");
    Ok(())
}
