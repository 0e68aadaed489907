// [apps/orchestrator/src/services/strategist.rs]
/*!
 * APARATO: RUNNER DEL ESTRATEGA (C2a)
 * RESPONSABILIDAD: Producir la evaluacion tactica de 2-3 frases a
 * partir del contexto de un snapshot, y persistirla en una sola
 * escritura transaccional (spec.md §4.2) para que el disparador de
 * notificacion de Postgres vea `minstrategy` junto con la transicion
 * de `status`.
 */

use crate::state::AppState;
use snapcast_domain_models::{DispatchRequest, Role, Snapshot};
use snapcast_infra_db::repositories::StrategyRepository;
use tracing::{error, info, instrument};

const SYSTEM_PROMPT: &str = "Eres un estratega de posicionamiento para conductores de rideshare. \
Responde con una recomendacion tactica de 2 a 3 frases en prosa llana, sin listas ni markdown.";

fn build_user_prompt(snapshot: &Snapshot) -> String {
    let place = snapshot
        .resolved_place
        .formatted_address
        .clone()
        .unwrap_or_else(|| "ubicacion desconocida".to_string());

    let weather = snapshot
        .weather
        .as_ref()
        .map(|w| format!("{}F, {}", w.temp_f, w.conditions))
        .unwrap_or_else(|| "sin datos de clima".to_string());

    let holiday = snapshot
        .holiday
        .clone()
        .unwrap_or_else(|| "ninguno".to_string());

    format!(
        "Ubicacion: {place}\nDia: {}, hora local: {} ({})\nClima: {weather}\nFeriado: {holiday}",
        snapshot.day_of_week, snapshot.local_iso, snapshot.day_part_key
    )
}

/// Ejecuta el runner del Estratega para `snapshot_id`. Falla contenida:
/// toda ruta de error queda dentro de esta funcion, nunca se propaga a
/// los hermanos C2b/C2c (spec.md §4.2, ultimo parrafo).
#[instrument(skip(state))]
pub async fn run_min_strategy(state: AppState, snapshot: Snapshot) {
    let snapshot = &snapshot;
    let state = &state;
    let request = DispatchRequest {
        role: Role::Strategist,
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_prompt: build_user_prompt(snapshot),
        expects_json: false,
    };

    let outcome = state.dispatcher.dispatch(request).await;
    let repo = StrategyRepository::new(&state.pool);

    match outcome {
        snapcast_domain_models::DispatchOutcome::Success { text, .. } => {
            let write = repo
                .write_minstrategy_success(
                    snapshot.snapshot_id,
                    text.trim(),
                    snapshot.resolved_place.formatted_address.as_deref(),
                    snapshot.resolved_place.city.as_deref(),
                    snapshot.resolved_place.state.as_deref(),
                )
                .await;

            if let Err(err) = write {
                error!(snapshot_id = %snapshot.snapshot_id, error = %err, "🔥 [STRATEGIST]: write_failed persisting minstrategy");
                let _ = repo
                    .write_minstrategy_failure(snapshot.snapshot_id, &err.to_string())
                    .await;
            } else {
                info!(snapshot_id = %snapshot.snapshot_id, "✅ [STRATEGIST]: minstrategy persisted");
            }
        }
        snapcast_domain_models::DispatchOutcome::Failure { error: message, .. } => {
            error!(snapshot_id = %snapshot.snapshot_id, error = %message, "⚠️ [STRATEGIST]: provider call failed");
            let _ = repo
                .write_minstrategy_failure(snapshot.snapshot_id, &message)
                .await;
        }
    }
}
