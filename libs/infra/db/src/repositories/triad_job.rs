// [libs/infra/db/src/repositories/triad_job.rs]
/*!
 * APARATO: TRIAD JOB REPOSITORY
 * RESPONSABILIDAD: Ticket de cola append-only, usado por el
 * Orquestador de Tuberia (C4) para distinguir la primera admision de
 * reintentos dentro de la ventana de idempotencia (spec.md §4.4 paso 4).
 */

use crate::errors::DbError;
use snapcast_domain_models::{TriadJob, TriadJobStatus};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

pub struct TriadJobRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TriadJobRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Inserta con conflicto-no-hacer-nada. Retorna `true` si esta
    /// llamada produjo la fila (primera admision), `false` si ya
    /// existia (solicitud duplicada dentro de la ventana).
    #[instrument(skip(self))]
    pub async fn try_admit(&self, snapshot_id: Uuid, kind: &str) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO triad_jobs (snapshot_id, kind, status)
            VALUES ($1, $2, 'queued')
            ON CONFLICT (snapshot_id) DO NOTHING
            "#,
        )
        .bind(snapshot_id)
        .bind(kind)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    pub async fn find(&self, snapshot_id: Uuid) -> Result<Option<TriadJob>, DbError> {
        let row = sqlx::query(
            "SELECT snapshot_id, kind, status, created_at FROM triad_jobs WHERE snapshot_id = $1",
        )
        .bind(snapshot_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            let status_raw: String = r.try_get("status")?;
            Ok(TriadJob {
                snapshot_id: r.try_get("snapshot_id")?,
                kind: r.try_get("kind")?,
                status: parse_status(&status_raw)?,
                created_at: r.try_get("created_at")?,
            })
        })
        .transpose()
    }

    #[instrument(skip(self))]
    pub async fn mark_status(&self, snapshot_id: Uuid, status: TriadJobStatus) -> Result<(), DbError> {
        sqlx::query("UPDATE triad_jobs SET status = $2 WHERE snapshot_id = $1")
            .bind(snapshot_id)
            .bind(status.as_db_str())
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

fn parse_status(raw: &str) -> Result<TriadJobStatus, DbError> {
    match raw {
        "queued" => Ok(TriadJobStatus::Queued),
        "running" => Ok(TriadJobStatus::Running),
        "done" => Ok(TriadJobStatus::Done),
        "error" => Ok(TriadJobStatus::Error),
        other => Err(DbError::MappingError(format!("unknown triad job status {other}"))),
    }
}
