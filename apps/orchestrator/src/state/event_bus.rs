// [apps/orchestrator/src/state/event_bus.rs]
/*!
 * APARATO: DIFUSOR DE EVENTOS SSE (C7)
 * RESPONSABILIDAD: Conjunto de colas por suscriptor, cada una servida
 * por su propia tarea de escritura SSE; el bucle de notificacion
 * empuja a todas las colas sin bloquear y descarta en desbordamiento
 * (SPEC_FULL.md §9) — a diferencia del `broadcast::Sender` unico del
 * bus de eventos original, que comparte un buffer entre todos los
 * suscriptores y no permite el descarte selectivo por suscriptor lento
 * que pide el diseño aqui. Ver DESIGN.md para la justificacion de esta
 * desviacion.
 */

use snapcast_domain_models::{NotificationChannel, NotificationPayload};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone)]
pub struct ChannelEvent {
    pub channel: NotificationChannel,
    pub payload: NotificationPayload,
}

#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error("channel at capacity")]
    AtCapacity,
}

pub struct EventBus {
    soft_cap_per_channel: usize,
    queue_depth: usize,
    subscribers: Mutex<HashMap<NotificationChannel, Vec<mpsc::Sender<ChannelEvent>>>>,
}

impl EventBus {
    pub fn new(soft_cap_per_channel: usize, queue_depth: usize) -> Self {
        Self {
            soft_cap_per_channel,
            queue_depth,
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    /// Registra un nuevo suscriptor para el canal dado. Rechaza mas
    /// alla del tope blando por canal (SPEC_FULL.md §4.7: "suggested
    /// soft cap 100, reject with 503 beyond").
    #[instrument(skip(self))]
    pub fn subscribe(
        &self,
        channel: NotificationChannel,
    ) -> Result<mpsc::Receiver<ChannelEvent>, SubscribeError> {
        let mut subscribers = self.subscribers.lock().expect("event bus mutex poisoned");
        let slot = subscribers.entry(channel).or_default();
        slot.retain(|sender| !sender.is_closed());

        if slot.len() >= self.soft_cap_per_channel {
            return Err(SubscribeError::AtCapacity);
        }

        let (sender, receiver) = mpsc::channel(self.queue_depth);
        slot.push(sender);
        Ok(receiver)
    }

    /// Empuja el evento a cada suscriptor vivo del canal sin bloquear;
    /// un suscriptor con la cola llena pierde el mensaje en vez de
    /// frenar al resto (SPEC_FULL.md §9).
    #[instrument(skip(self, payload))]
    pub fn publish(&self, channel: NotificationChannel, payload: NotificationPayload) {
        let mut subscribers = self.subscribers.lock().expect("event bus mutex poisoned");
        let Some(slot) = subscribers.get_mut(&channel) else {
            return;
        };

        let event = ChannelEvent { channel, payload };
        slot.retain(|sender| match sender.try_send(event.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(?channel, "📡 [EVENT_BUS]: subscriber queue full, dropping message");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });

        debug!(?channel, live_subscribers = slot.len(), "📡 [EVENT_BUS]: published");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn subscriber_observes_published_event_before_unrelated_control_message() {
        let bus = EventBus::new(100, 16);
        let mut receiver = bus.subscribe(NotificationChannel::StrategyReady).unwrap();

        let snapshot_id = Uuid::new_v4();
        bus.publish(
            NotificationChannel::StrategyReady,
            NotificationPayload::for_snapshot(snapshot_id),
        );
        bus.publish(
            NotificationChannel::StrategyReady,
            NotificationPayload::for_snapshot(Uuid::new_v4()),
        );

        let first = receiver.recv().await.unwrap();
        assert_eq!(first.payload.snapshot_id, snapshot_id);
    }

    #[test]
    fn rejects_subscription_beyond_soft_cap() {
        let bus = EventBus::new(1, 16);
        let _first = bus.subscribe(NotificationChannel::BlocksReady).unwrap();
        assert!(matches!(
            bus.subscribe(NotificationChannel::BlocksReady),
            Err(SubscribeError::AtCapacity)
        ));
    }

    #[tokio::test]
    async fn full_subscriber_queue_drops_message_without_blocking_publish() {
        let bus = EventBus::new(100, 1);
        let mut receiver = bus.subscribe(NotificationChannel::StrategyProgress).unwrap();

        bus.publish(
            NotificationChannel::StrategyProgress,
            NotificationPayload::for_snapshot(Uuid::new_v4()),
        );
        // La cola (profundidad 1) ya esta llena; este segundo publish
        // debe descartarse sin bloquear ni entrar en panico.
        bus.publish(
            NotificationChannel::StrategyProgress,
            NotificationPayload::for_snapshot(Uuid::new_v4()),
        );

        let _ = receiver.recv().await.unwrap();
    }
}
