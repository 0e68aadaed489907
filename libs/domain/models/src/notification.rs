// [libs/domain/models/src/notification.rs]
/*!
 * APARATO: NOTIFICATION CHANNEL CONTRACTS
 * RESPONSABILIDAD: Los tres canales de cambio observables del sistema
 * (`strategy_progress`, `strategy_ready`, `blocks_ready`) y la forma de
 * su payload JSON, compartida entre el Escuchador de Cambios (C5), el
 * Bus de Eventos interno y el Difusor SSE (C7).
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    StrategyProgress,
    StrategyReady,
    BlocksReady,
}

impl NotificationChannel {
    pub const ALL: [NotificationChannel; 3] = [
        NotificationChannel::StrategyProgress,
        NotificationChannel::StrategyReady,
        NotificationChannel::BlocksReady,
    ];

    pub fn as_db_channel(self) -> &'static str {
        match self {
            NotificationChannel::StrategyProgress => "strategy_progress",
            NotificationChannel::StrategyReady => "strategy_ready",
            NotificationChannel::BlocksReady => "blocks_ready",
        }
    }

    pub fn from_db_channel(raw: &str) -> Option<Self> {
        match raw {
            "strategy_progress" => Some(NotificationChannel::StrategyProgress),
            "strategy_ready" => Some(NotificationChannel::StrategyReady),
            "blocks_ready" => Some(NotificationChannel::BlocksReady),
            _ => None,
        }
    }
}

/// Payload JSON transportado por cada mensaje de canal: `snapshot_id`
/// mas un `ranking_id` opcional, exclusivo de `blocks_ready`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub snapshot_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking_id: Option<Uuid>,
}

impl NotificationPayload {
    pub fn for_snapshot(snapshot_id: Uuid) -> Self {
        Self {
            snapshot_id,
            ranking_id: None,
        }
    }
}
