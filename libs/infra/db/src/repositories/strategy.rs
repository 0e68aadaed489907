// [libs/infra/db/src/repositories/strategy.rs]
/*!
 * APARATO: STRATEGY ROW REPOSITORY
 * RESPONSABILIDAD: Todas las mutaciones permitidas sobre
 * `strategy_rows` (SPEC_FULL.md §3, §4.2, §4.4, §4.6). Cada escritura
 * de estado pasa por una unica sentencia `UPDATE` para que el trigger
 * de notificacion vea la fila completa en una sola transaccion
 * (spec.md §4.2: "must be a single transactional update").
 */

use crate::errors::DbError;
use snapcast_domain_models::{StrategyRow, StrategyStatus, TriggerReason};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

pub struct StrategyRepository<'a> {
    pool: &'a PgPool,
}

#[derive(Debug, Clone)]
pub struct StrategyHistoryEntry {
    pub snapshot_id: Uuid,
    pub status: StrategyStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl<'a> StrategyRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Inserta con `status='pending'` si no existe fila aun — idempotente
    /// por diseño (spec.md §4.4 paso 3).
    #[instrument(skip(self))]
    pub async fn ensure_pending(
        &self,
        snapshot_id: Uuid,
        trigger_reason: TriggerReason,
        user_id: Option<Uuid>,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO strategy_rows (snapshot_id, status, trigger_reason, user_id)
            VALUES ($1, 'pending', $2, $3)
            ON CONFLICT (snapshot_id) DO NOTHING
            "#,
        )
        .bind(snapshot_id)
        .bind(trigger_reason.as_db_str())
        .bind(user_id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn find(&self, snapshot_id: Uuid) -> Result<StrategyRow, DbError> {
        let row = sqlx::query(
            r#"
            SELECT snapshot_id, minstrategy, consolidated_strategy, status,
                   error_message, error_code, holiday, strategy_timestamp,
                   user_resolved_address, user_resolved_city, user_resolved_state,
                   trigger_reason, created_at, updated_at
            FROM strategy_rows
            WHERE snapshot_id = $1
            "#,
        )
        .bind(snapshot_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::NotFound)?;

        row_to_strategy(&row)
    }

    /// Escritura del Estratega (C2a) tras exito: `minstrategy`,
    /// direccion/ciudad/estado resueltos, `status='ok'`,
    /// `strategy_timestamp`. Una sola sentencia (spec.md §4.2).
    #[instrument(skip(self, minstrategy))]
    pub async fn write_minstrategy_success(
        &self,
        snapshot_id: Uuid,
        minstrategy: &str,
        user_resolved_address: Option<&str>,
        user_resolved_city: Option<&str>,
        user_resolved_state: Option<&str>,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            UPDATE strategy_rows
            SET minstrategy = $2,
                user_resolved_address = $3,
                user_resolved_city = $4,
                user_resolved_state = $5,
                status = 'ok',
                strategy_timestamp = now(),
                updated_at = now()
            WHERE snapshot_id = $1
            "#,
        )
        .bind(snapshot_id)
        .bind(minstrategy)
        .bind(user_resolved_address)
        .bind(user_resolved_city)
        .bind(user_resolved_state)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Marca `status='write_failed'` cuando la persistencia del
    /// Estratega falla (spec.md §4.2, ultima frase).
    #[instrument(skip(self))]
    pub async fn write_minstrategy_failure(
        &self,
        snapshot_id: Uuid,
        error_message: &str,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            UPDATE strategy_rows
            SET status = 'write_failed', error_message = $2, updated_at = now()
            WHERE snapshot_id = $1
            "#,
        )
        .bind(snapshot_id)
        .bind(error_message)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Parche no fatal del Verificador de Feriados (C2c).
    #[instrument(skip(self))]
    pub async fn patch_holiday(&self, snapshot_id: Uuid, holiday: &str) -> Result<(), DbError> {
        sqlx::query("UPDATE strategy_rows SET holiday = $2, updated_at = now() WHERE snapshot_id = $1")
            .bind(snapshot_id)
            .bind(holiday)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Escritura del Consolidador (C6) en exito, degradacion, o fallo.
    /// `status` ya viene resuelto por el llamador ('ok' o 'failed').
    #[instrument(skip(self, consolidated_strategy, error_message))]
    pub async fn write_consolidation(
        &self,
        snapshot_id: Uuid,
        consolidated_strategy: Option<&str>,
        status: StrategyStatus,
        error_message: Option<&str>,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            UPDATE strategy_rows
            SET consolidated_strategy = COALESCE($2, consolidated_strategy),
                status = $3,
                error_message = $4,
                updated_at = now()
            WHERE snapshot_id = $1
            "#,
        )
        .bind(snapshot_id)
        .bind(consolidated_strategy)
        .bind(status.as_db_str())
        .bind(error_message)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Marca la fila como pendiente con un mensaje de espera cuando el
    /// consolidador determina que faltan salidas de rol
    /// (spec.md §4.6 paso 3). La clausula `WHERE` excluye filas que ya
    /// estan en este mismo estado: sin eso, cada notificacion perdida
    /// reenvia un `UPDATE` no-op que dispararia `strategy_progress` de
    /// nuevo y reinvocaria al consolidador sin fin mientras falten
    /// salidas de rol (ver guardia en `schema.rs`).
    #[instrument(skip(self))]
    pub async fn mark_waiting_on_roles(&self, snapshot_id: Uuid) -> Result<(), DbError> {
        sqlx::query(
            r#"
            UPDATE strategy_rows
            SET status = 'pending', error_message = 'missing role outputs', updated_at = now()
            WHERE snapshot_id = $1
                AND (status IS DISTINCT FROM 'pending' OR error_message IS DISTINCT FROM 'missing role outputs')
            "#,
        )
        .bind(snapshot_id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Snapshots aun en `status='pending'` — usado por el barrido de
    /// recuperacion del Oyente de Cambios tras una reconexion, para
    /// reproducir notificaciones perdidas durante la caida (SPEC_FULL.md
    /// §4.5).
    #[instrument(skip(self))]
    pub async fn pending_snapshot_ids(&self) -> Result<Vec<Uuid>, DbError> {
        let rows = sqlx::query("SELECT snapshot_id FROM strategy_rows WHERE status = 'pending'")
            .fetch_all(self.pool)
            .await?;

        rows.iter().map(|row| Ok(row.try_get("snapshot_id")?)).collect()
    }

    /// Filas de intento para un usuario, mas recientes primero — soporta
    /// `GET /api/strategy/history?user_id=…` (spec.md §6). `user_id` es
    /// una columna denormalizada fuera de las entidades centrales; la
    /// propiedad permanece en el almacen externo de snapshots.
    #[instrument(skip(self))]
    pub async fn history_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<StrategyHistoryEntry>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT snapshot_id, status, created_at, updated_at
            FROM strategy_rows
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let status_raw: String = row.try_get("status")?;
                Ok(StrategyHistoryEntry {
                    snapshot_id: row.try_get("snapshot_id")?,
                    status: StrategyStatus::from_db_str(&status_raw)
                        .ok_or_else(|| DbError::MappingError(format!("unknown status {status_raw}")))?,
                    created_at: row.try_get("created_at")?,
                    updated_at: row.try_get("updated_at")?,
                })
            })
            .collect()
    }
}

fn row_to_strategy(row: &sqlx::postgres::PgRow) -> Result<StrategyRow, DbError> {
    let status_raw: String = row.try_get("status")?;
    let trigger_reason_raw: String = row.try_get("trigger_reason")?;

    Ok(StrategyRow {
        snapshot_id: row.try_get("snapshot_id")?,
        minstrategy: row.try_get("minstrategy")?,
        consolidated_strategy: row.try_get("consolidated_strategy")?,
        status: StrategyStatus::from_db_str(&status_raw)
            .ok_or_else(|| DbError::MappingError(format!("unknown status {status_raw}")))?,
        error_message: row.try_get("error_message")?,
        error_code: row.try_get("error_code")?,
        holiday: row.try_get("holiday")?,
        strategy_timestamp: row.try_get("strategy_timestamp")?,
        user_resolved_address: row.try_get("user_resolved_address")?,
        user_resolved_city: row.try_get("user_resolved_city")?,
        user_resolved_state: row.try_get("user_resolved_state")?,
        trigger_reason: match trigger_reason_raw.as_str() {
            "retry" => TriggerReason::Retry,
            _ => TriggerReason::Initial,
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
