// [libs/domain/models/src/triad_job.rs]
/*!
 * APARATO: TRIAD JOB ENTITY
 * RESPONSABILIDAD: Ticket de cola que prueba que una solicitud fue
 * admitida. Append-only, con restriccion unica sobre `snapshot_id`.
 * Distingue la primera admision de reintentos dentro de la ventana de
 * idempotencia.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriadJobStatus {
    Queued,
    Running,
    Done,
    Error,
}

impl TriadJobStatus {
    pub fn as_db_str(self) -> &'static str {
        match self {
            TriadJobStatus::Queued => "queued",
            TriadJobStatus::Running => "running",
            TriadJobStatus::Done => "done",
            TriadJobStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriadJob {
    pub snapshot_id: Uuid,
    pub kind: String,
    pub status: TriadJobStatus,
    pub created_at: DateTime<Utc>,
}
