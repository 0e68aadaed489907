// [libs/infra/db/src/repositories/snapshot.rs]
/*!
 * APARATO: SNAPSHOT REPOSITORY (C3 FOUNDATION)
 * RESPONSABILIDAD: Accesor de solo lectura sobre `snapshots`, mas las
 * dos unicas mutaciones permitidas fuera del almacen externo: el
 * parche de feriado (C2c) y la insercion de una copia de reintento
 * (C9). Nunca cachea — cada llamada relee, para que un parche de
 * feriado sea observable por runners posteriores (SPEC_FULL.md §4.3).
 */

use crate::errors::DbError;
use snapcast_domain_models::{AirportContext, Coordinates, ResolvedPlace, Snapshot, TriggerReason, Weather};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

pub struct SnapshotRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SnapshotRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self))]
    pub async fn find(&self, snapshot_id: Uuid) -> Result<Snapshot, DbError> {
        let row = sqlx::query(
            r#"
            SELECT snapshot_id, lat, lng, city, state, country, formatted_address,
                   timezone, local_iso, day_of_week, day_part_key, hour,
                   weather, airport_context, holiday, is_holiday, trigger_reason, created_at
            FROM snapshots
            WHERE snapshot_id = $1
            "#,
        )
        .bind(snapshot_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::NotFound)?;

        row_to_snapshot(&row)
    }

    /// Parcha `holiday`/`is_holiday` — la unica escritura que C2c
    /// realiza sobre la entidad Snapshot, que en lo demas es propiedad
    /// exclusiva del almacen externo.
    #[instrument(skip(self))]
    pub async fn patch_holiday(
        &self,
        snapshot_id: Uuid,
        holiday: Option<&str>,
        is_holiday: bool,
    ) -> Result<(), DbError> {
        sqlx::query("UPDATE snapshots SET holiday = $2, is_holiday = $3 WHERE snapshot_id = $1")
            .bind(snapshot_id)
            .bind(holiday)
            .bind(is_holiday)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Inserta una copia de un snapshot existente bajo un nuevo id,
    /// preservando ubicacion/clima/aeropuerto y marcando
    /// `trigger_reason='retry'` — usado exclusivamente por el
    /// Controlador de Reintento (C9).
    #[instrument(skip(self, source))]
    pub async fn insert_retry_copy(
        &self,
        new_snapshot_id: Uuid,
        source: &Snapshot,
    ) -> Result<(), DbError> {
        let weather_json = source
            .weather
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| DbError::MappingError(e.to_string()))?;
        let airport_json = source
            .airport_context
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| DbError::MappingError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO snapshots (
                snapshot_id, lat, lng, city, state, country, formatted_address,
                timezone, local_iso, day_of_week, day_part_key, hour,
                weather, airport_context, holiday, is_holiday, trigger_reason
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(new_snapshot_id)
        .bind(source.coordinates.lat)
        .bind(source.coordinates.lng)
        .bind(&source.resolved_place.city)
        .bind(&source.resolved_place.state)
        .bind(&source.resolved_place.country)
        .bind(&source.resolved_place.formatted_address)
        .bind(&source.timezone)
        .bind(&source.local_iso)
        .bind(&source.day_of_week)
        .bind(&source.day_part_key)
        .bind(source.hour)
        .bind(weather_json)
        .bind(airport_json)
        .bind(&source.holiday)
        .bind(source.is_holiday)
        .bind(TriggerReason::Retry.as_db_str())
        .execute(self.pool)
        .await?;

        Ok(())
    }
}

fn row_to_snapshot(row: &sqlx::postgres::PgRow) -> Result<Snapshot, DbError> {
    let weather: Option<serde_json::Value> = row.try_get("weather")?;
    let airport_context: Option<serde_json::Value> = row.try_get("airport_context")?;
    let trigger_reason_raw: String = row.try_get("trigger_reason")?;

    Ok(Snapshot {
        snapshot_id: row.try_get("snapshot_id")?,
        coordinates: Coordinates {
            lat: row.try_get("lat")?,
            lng: row.try_get("lng")?,
        },
        resolved_place: ResolvedPlace {
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            country: row.try_get("country")?,
            formatted_address: row.try_get("formatted_address")?,
        },
        timezone: row.try_get("timezone")?,
        local_iso: row.try_get("local_iso")?,
        day_of_week: row.try_get("day_of_week")?,
        day_part_key: row.try_get("day_part_key")?,
        hour: row.try_get("hour")?,
        weather: weather
            .map(serde_json::from_value::<Weather>)
            .transpose()
            .map_err(|e| DbError::MappingError(format!("weather: {e}")))?,
        airport_context: airport_context
            .map(serde_json::from_value::<AirportContext>)
            .transpose()
            .map_err(|e| DbError::MappingError(format!("airport_context: {e}")))?,
        holiday: row.try_get("holiday")?,
        is_holiday: row.try_get("is_holiday")?,
        trigger_reason: match trigger_reason_raw.as_str() {
            "retry" => TriggerReason::Retry,
            _ => TriggerReason::Initial,
        },
        created_at: row.try_get("created_at")?,
    })
}
