// [libs/infra/db/src/repositories/briefing.rs]
/*!
 * APARATO: BRIEFING ROW REPOSITORY
 * RESPONSABILIDAD: Insercion-o-actualizacion por `snapshot_id`
 * (spec.md §4.2). La fusion inteligente (smart-merge, ver
 * `snapcast_domain_models::briefing::merge`) ocurre en la capa de
 * servicio antes de llamar aqui — este repositorio persiste el valor
 * ya fusionado, no decide la fusion.
 */

use crate::errors::DbError;
use snapcast_domain_models::BriefingRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

pub struct BriefingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BriefingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self))]
    pub async fn find(&self, snapshot_id: Uuid) -> Result<Option<BriefingRow>, DbError> {
        let row = sqlx::query(
            r#"
            SELECT snapshot_id, global_travel, domestic_travel, local_traffic, weather_impacts,
                   events_nearby, rideshare_intel, citations, updated_at
            FROM briefing_rows
            WHERE snapshot_id = $1
            "#,
        )
        .bind(snapshot_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| row_to_briefing(&r)).transpose()
    }

    /// Inserta o actualiza la fila completa con el resultado ya
    /// fusionado por `briefing::merge`.
    #[instrument(skip(self, briefing))]
    pub async fn upsert(&self, snapshot_id: Uuid, briefing: &BriefingRow) -> Result<(), DbError> {
        let citations = serde_json::to_value(&briefing.citations)
            .map_err(|e| DbError::MappingError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO briefing_rows (
                snapshot_id, global_travel, domestic_travel, local_traffic,
                weather_impacts, events_nearby, rideshare_intel, citations, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
            ON CONFLICT (snapshot_id) DO UPDATE SET
                global_travel = EXCLUDED.global_travel,
                domestic_travel = EXCLUDED.domestic_travel,
                local_traffic = EXCLUDED.local_traffic,
                weather_impacts = EXCLUDED.weather_impacts,
                events_nearby = EXCLUDED.events_nearby,
                rideshare_intel = EXCLUDED.rideshare_intel,
                citations = EXCLUDED.citations,
                updated_at = now()
            "#,
        )
        .bind(snapshot_id)
        .bind(&briefing.global_travel)
        .bind(&briefing.domestic_travel)
        .bind(&briefing.local_traffic)
        .bind(&briefing.weather_impacts)
        .bind(&briefing.events_nearby)
        .bind(&briefing.rideshare_intel)
        .bind(citations)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}

fn row_to_briefing(row: &sqlx::postgres::PgRow) -> Result<BriefingRow, DbError> {
    let citations_json: serde_json::Value = row.try_get("citations")?;
    let citations: Vec<String> =
        serde_json::from_value(citations_json).map_err(|e| DbError::MappingError(e.to_string()))?;

    Ok(BriefingRow {
        snapshot_id: row.try_get("snapshot_id")?,
        global_travel: row.try_get("global_travel")?,
        domestic_travel: row.try_get("domestic_travel")?,
        local_traffic: row.try_get("local_traffic")?,
        weather_impacts: row.try_get("weather_impacts")?,
        events_nearby: row.try_get("events_nearby")?,
        rideshare_intel: row.try_get("rideshare_intel")?,
        citations,
        updated_at: row.try_get("updated_at")?,
    })
}
