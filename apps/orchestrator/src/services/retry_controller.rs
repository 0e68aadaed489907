// [apps/orchestrator/src/services/retry_controller.rs]
/*!
 * APARATO: CONTROLADOR DE REINTENTO (C9)
 * RESPONSABILIDAD: Re-clavar un snapshot existente bajo un nuevo id,
 * preservando ubicacion/clima/aeropuerto, y resembrar la tuberia
 * (spec.md §4.9). La hora local recomputada usa la zona horaria propia
 * del snapshot, nunca la hora del servidor — unico punto del sistema
 * donde se recalcula "ahora", por eso pasa por `chrono_tz` en vez de
 * `chrono::Local`.
 */

use crate::services::admission;
use crate::state::AppState;
use chrono::{Timelike, Utc};
use snapcast_domain_models::{day_part_key_for_hour, Snapshot, TriggerReason};
use snapcast_infra_db::repositories::SnapshotRepository;
use snapcast_infra_db::DbError;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RetryError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("snapshot timezone {0:?} is not a recognized IANA zone")]
    UnrecognizedTimezone(String),
}

pub struct RetryOutcome {
    pub new_snapshot_id: Uuid,
}

pub async fn retry(state: &AppState, original_snapshot_id: Uuid) -> Result<RetryOutcome, RetryError> {
    let snapshot_repo = SnapshotRepository::new(&state.pool);
    let original = snapshot_repo.find(original_snapshot_id).await?;

    let new_snapshot_id = Uuid::new_v4();
    let reseeded = reseed_for_now(&original, new_snapshot_id)?;

    snapshot_repo
        .insert_retry_copy(new_snapshot_id, &reseeded)
        .await?;

    let admission = admission::admit(state, new_snapshot_id, TriggerReason::Retry, None).await?;
    info!(
        %original_snapshot_id,
        %new_snapshot_id,
        kicked = ?admission.kicked,
        "🔁 [RETRY]: new pipeline run seeded from prior snapshot"
    );

    Ok(RetryOutcome { new_snapshot_id })
}

/// Produce un clon en memoria de `original` con el id, hora local,
/// dia de la semana, hora y franja horaria recomputados en la zona
/// propia del snapshot — todo lo demas (coordenadas, clima, contexto
/// de aeropuerto) se preserva sin cambios.
fn reseed_for_now(original: &Snapshot, new_snapshot_id: Uuid) -> Result<Snapshot, RetryError> {
    let tz: chrono_tz::Tz = original
        .timezone
        .parse()
        .map_err(|_| RetryError::UnrecognizedTimezone(original.timezone.clone()))?;

    let now_in_zone = Utc::now().with_timezone(&tz);
    let hour = now_in_zone.hour() as i32;

    Ok(Snapshot {
        snapshot_id: new_snapshot_id,
        local_iso: now_in_zone.to_rfc3339(),
        day_of_week: now_in_zone.format("%A").to_string(),
        day_part_key: day_part_key_for_hour(hour).to_string(),
        hour,
        trigger_reason: TriggerReason::Retry,
        created_at: Utc::now(),
        ..original.clone()
    })
}
