// [apps/orchestrator/src/services/listener.rs]
/*!
 * APARATO: SUPERVISOR DEL OYENTE DE CAMBIOS (C5)
 * RESPONSABILIDAD: Mantener viva la conexion dedicada de
 * `snapcast_infra_db::ChangeListener`, invocar al Consolidador (C6) por
 * cada notificacion de `strategy_progress`/`strategy_ready`, republicar
 * toda notificacion a los suscriptores SSE (C7), y ejecutar el barrido
 * de recuperacion tras cada reconexion (spec.md §4.5).
 *
 * `strategy_progress`/`strategy_ready` alimentan tanto al Consolidador
 * como al canal SSE correspondiente; `blocks_ready` solo republica —
 * no existe logica de consolidacion para esa senal (ver flujo resuelto
 * en DESIGN.md).
 */

use crate::services::consolidator;
use crate::state::AppState;
use snapcast_domain_models::NotificationChannel;
use snapcast_infra_db::listener::parse_notification_payload;
use snapcast_infra_db::repositories::StrategyRepository;
use snapcast_infra_db::ChangeListener;
use tracing::{error, info, warn};

/// Corre indefinidamente. Disenado para ser lanzado una sola vez por
/// proceso desde `kernel.rs`; una salida de esta funcion solo ocurre
/// si el oyente entra en estado `Fatal` tras agotar reconexiones
/// (spec.md §7, taxonomia `Fatal`) — el proceso sigue sirviendo HTTP
/// directo, pero pierde consolidacion dirigida por eventos hasta
/// reiniciar.
pub async fn run(state: AppState) {
    let mut change_listener = match ChangeListener::new(state.config.listener_database_url.clone()) {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, "🔥 [LISTENER_SUPERVISOR]: refusing to start, listener URL rejected");
            return;
        }
    };

    loop {
        let mut pg_listener = match change_listener.reconnect_with_backoff().await {
            Ok(pg_listener) => pg_listener,
            Err(err) => {
                error!(error = %err, "💀 [LISTENER_SUPERVISOR]: reconnection exhausted, entering fatal state");
                return;
            }
        };

        catch_up_sweep(&state).await;

        loop {
            match pg_listener.recv().await {
                Ok(notification) => {
                    handle_notification(&state, notification.channel(), notification.payload()).await;
                }
                Err(err) => {
                    warn!(error = %err, "📡 [LISTENER_SUPERVISOR]: connection lost, reconnecting");
                    break;
                }
            }
        }
    }
}

async fn handle_notification(state: &AppState, db_channel: &str, raw_payload: &str) {
    let Some(channel) = NotificationChannel::from_db_channel(db_channel) else {
        warn!(db_channel, "⚠️ [LISTENER_SUPERVISOR]: unrecognized channel, ignoring");
        return;
    };

    let payload = match parse_notification_payload(raw_payload) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(?channel, error = %err, "⚠️ [LISTENER_SUPERVISOR]: malformed notification payload");
            return;
        }
    };

    if matches!(
        channel,
        NotificationChannel::StrategyProgress | NotificationChannel::StrategyReady
    ) {
        consolidator::maybe_consolidate(state, payload.snapshot_id).await;
    }

    state.event_bus.publish(channel, payload);
}

/// Recupera las notificaciones perdidas durante la caida: cualquier
/// snapshot todavia `pending` pudo haber producido una escritura C2 que
/// el oyente no vio (spec.md §4.5, "catch-up sweep").
async fn catch_up_sweep(state: &AppState) {
    let repo = StrategyRepository::new(&state.pool);
    let pending = match repo.pending_snapshot_ids().await {
        Ok(pending) => pending,
        Err(err) => {
            warn!(error = %err, "⚠️ [LISTENER_SUPERVISOR]: catch-up sweep failed to list pending snapshots");
            return;
        }
    };

    if pending.is_empty() {
        return;
    }

    info!(count = pending.len(), "🧹 [LISTENER_SUPERVISOR]: replaying catch-up sweep");
    for snapshot_id in pending {
        consolidator::maybe_consolidate(state, snapshot_id).await;
    }
}
