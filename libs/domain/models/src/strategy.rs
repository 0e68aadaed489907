// [libs/domain/models/src/strategy.rs]
/*!
 * APARATO: STRATEGY ROW ENTITY
 * RESPONSABILIDAD: Bolsa de estado mutable de una corrida de tubería,
 * clave por `snapshot_id`, 1:1.
 *
 * Invariante: `consolidated_strategy` no vacío => `status` en
 * {Ok, Complete}. `status == Failed` => `error_message` no nulo.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `Complete` y `Ok` son sinónimos de "consolidado disponible" — ver
/// la pregunta abierta resuelta en SPEC_FULL.md §9. Siempre se escribe
/// `Ok`; `Complete` solo aparece al deserializar filas heredadas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyStatus {
    Pending,
    Complete,
    Ok,
    Failed,
    WriteFailed,
}

impl StrategyStatus {
    pub fn is_consolidated(self) -> bool {
        matches!(self, StrategyStatus::Ok | StrategyStatus::Complete)
    }

    pub fn as_db_str(self) -> &'static str {
        match self {
            StrategyStatus::Pending => "pending",
            StrategyStatus::Complete | StrategyStatus::Ok => "ok",
            StrategyStatus::Failed => "failed",
            StrategyStatus::WriteFailed => "write_failed",
        }
    }

    pub fn from_db_str(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(StrategyStatus::Pending),
            "ok" => Some(StrategyStatus::Ok),
            "complete" => Some(StrategyStatus::Complete),
            "failed" => Some(StrategyStatus::Failed),
            "write_failed" => Some(StrategyStatus::WriteFailed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerReason {
    Initial,
    Retry,
}

impl TriggerReason {
    pub fn as_db_str(self) -> &'static str {
        match self {
            TriggerReason::Initial => "initial",
            TriggerReason::Retry => "retry",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRow {
    pub snapshot_id: Uuid,
    pub minstrategy: Option<String>,
    pub consolidated_strategy: Option<String>,
    pub status: StrategyStatus,
    pub error_message: Option<String>,
    pub error_code: Option<String>,
    pub holiday: Option<String>,
    pub strategy_timestamp: Option<DateTime<Utc>>,
    pub user_resolved_address: Option<String>,
    pub user_resolved_city: Option<String>,
    pub user_resolved_state: Option<String>,
    pub trigger_reason: TriggerReason,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StrategyRow {
    /// Campos que el endpoint `GET /api/strategy/:id` todavia espera,
    /// usados para construir el arreglo `waitFor`. `briefing_present`
    /// viene de una consulta separada (la Briefing Row vive en otra
    /// tabla), no de este registro.
    pub fn wait_for(&self, briefing_present: bool) -> Vec<&'static str> {
        let mut waiting = Vec::new();
        if self.minstrategy.as_deref().unwrap_or("").trim().is_empty() {
            waiting.push("minstrategy");
        }
        if !briefing_present {
            waiting.push("briefing");
        }
        if !self.status.is_consolidated() {
            waiting.push("consolidated");
        }
        waiting
    }
}
