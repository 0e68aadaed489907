// [libs/domain/models/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DOMAIN MODELS ROOT (SINGLE SOURCE OF TRUTH)
 * CLASIFICACIÓN: CRATE ROOT (ESTRATO L2)
 * RESPONSABILIDAD: DEFINICIÓN DE ENTIDADES COMPARTIDAS ENTRE ESTRATOS
 *
 * Ningún módulo aquí conoce Postgres, axum, ni los proveedores de
 * modelos. Son DTOs puros: si un campo cambia de forma aquí, todos los
 * estratos que lo consumen lo ven en tiempo de compilación.
 * =================================================================
 */

pub mod snapshot;
pub mod strategy;
pub mod briefing;
pub mod triad_job;
pub mod envelope;
pub mod notification;

pub use snapshot::{day_part_key_for_hour, AirportContext, Coordinates, ResolvedPlace, Snapshot, Weather};
pub use strategy::{StrategyRow, StrategyStatus, TriggerReason};
pub use briefing::BriefingRow;
pub use triad_job::{TriadJob, TriadJobStatus};
pub use envelope::{DispatchOutcome, DispatchRequest, Role};
pub use notification::{NotificationChannel, NotificationPayload};
