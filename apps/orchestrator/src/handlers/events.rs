// [apps/orchestrator/src/handlers/events.rs]
/*!
 * APARATO: DIFUSOR SSE DE EVENTOS DE CAMBIO (C7)
 * RESPONSABILIDAD: `GET /events/strategy`, `GET /events/blocks`
 * (spec.md §6) — cada uno registra al cliente como un suscriptor del
 * `EventBus` y reenvia cada `ChannelEvent` como `event: <channel>\ndata:
 * <payload-json>\n\n`. Entrega a-lo-sumo-una-vez por suscriptor vivo;
 * un suscriptor que se conecta despues de una notificacion la pierde
 * por diseño (spec.md §4.7).
 */

use crate::errors::OrchestratorError;
use crate::state::AppState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use futures::Stream;
use snapcast_domain_models::NotificationChannel;
use std::convert::Infallible;
use std::time::Duration;

/// `GET /events/strategy` — reenvia `strategy_progress` y
/// `strategy_ready`; este flujo es el unico de los dos que un cliente
/// necesita para reconciliar el estado de una corrida (spec.md §4.7,
/// nota de reconciliacion via `GET /api/strategy/:id`).
pub async fn strategy_events(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, OrchestratorError> {
    subscribe_and_stream(
        state,
        &[NotificationChannel::StrategyProgress, NotificationChannel::StrategyReady],
    )
}

/// `GET /events/blocks` — reenvia `blocks_ready`.
pub async fn blocks_events(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, OrchestratorError> {
    subscribe_and_stream(state, &[NotificationChannel::BlocksReady])
}

fn subscribe_and_stream(
    state: AppState,
    channels: &[NotificationChannel],
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, OrchestratorError> {
    let mut receivers: Vec<_> = channels
        .iter()
        .map(|channel| state.event_bus.subscribe(*channel))
        .collect::<Result<_, _>>()
        .map_err(|_| OrchestratorError::EnqueueFailed("subscriber capacity reached".to_string()))?;

    let stream = async_stream::stream! {
        loop {
            let next = futures::future::select_all(receivers.iter_mut().map(|receiver| Box::pin(receiver.recv())));
            let (event, index, _) = next.await;
            let Some(event) = event else {
                receivers.remove(index);
                if receivers.is_empty() {
                    break;
                }
                continue;
            };

            let built = Event::default()
                .event(event.channel.as_db_channel())
                .json_data(&event.payload)
                .unwrap_or_else(|_| Event::default().event(event.channel.as_db_channel()));
            yield Ok(built);
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
