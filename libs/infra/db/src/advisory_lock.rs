// [libs/infra/db/src/advisory_lock.rs]
/*!
 * APARATO: CONSOLIDATION ADVISORY LOCK
 * RESPONSABILIDAD: Unica exclusion mutua entre procesos del diseño —
 * deriva una clave de 64 bits de `"consolidate:" + snapshot_id` via
 * SHA-1 truncado, y la usa con `pg_try_advisory_lock` (no bloqueante).
 * Ver SPEC_FULL.md §4.6 y §9.
 */

use crate::errors::DbError;
use sha1::{Digest, Sha1};
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tracing::{instrument, warn};
use uuid::Uuid;

/// Deriva la clave de candado de asesoria de 64 bits para un snapshot.
/// Determinista: el mismo `snapshot_id` siempre produce la misma clave.
pub fn derive_lock_key(snapshot_id: Uuid) -> i64 {
    let mut hasher = Sha1::new();
    hasher.update(b"consolidate:");
    hasher.update(snapshot_id.to_string().as_bytes());
    let digest = hasher.finalize();

    let mut truncated = [0u8; 8];
    truncated.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(truncated)
}

/// El candado de asesoria es de alcance de *sesion*: vive en la
/// conexion fisica que lo adquirio, no en el pool logico. `try_acquire`
/// saca una `PoolConnection` dedicada del pool y la retiene hasta
/// `release` (o hasta que `AdvisoryLock` se descarte) — adquirir y
/// liberar en conexiones distintas del mismo pool deja el candado
/// retenido en una sesion huerfana que nunca se desbloquea.
pub struct AdvisoryLock<'a> {
    pool: &'a PgPool,
    key: i64,
    connection: Option<PoolConnection<Postgres>>,
}

impl<'a> AdvisoryLock<'a> {
    pub fn new(pool: &'a PgPool, snapshot_id: Uuid) -> Self {
        Self {
            pool,
            key: derive_lock_key(snapshot_id),
            connection: None,
        }
    }

    /// Intenta adquirir el candado sin bloquear. `Ok(false)` significa
    /// que otro proceso ya lo posee — un "silencioso skip", no un error
    /// (ver taxonomia `Contention` en SPEC_FULL.md §7). La conexion que
    /// ejecuta `pg_try_advisory_lock` se retiene en `self.connection`
    /// mientras el candado siga en pie, para que `release` lo libere en
    /// la misma sesion.
    #[instrument(skip(self))]
    pub async fn try_acquire(&mut self) -> Result<bool, DbError> {
        let mut connection = self.pool.acquire().await?;
        let acquired: (bool,) = sqlx::query_as("SELECT pg_try_advisory_lock($1)")
            .bind(self.key)
            .fetch_one(&mut *connection)
            .await?;

        if acquired.0 {
            self.connection = Some(connection);
        }
        Ok(acquired.0)
    }

    /// Libera el candado en la misma conexion que lo adquirio, luego la
    /// devuelve al pool. No-op si este `AdvisoryLock` nunca llego a
    /// retener el candado.
    #[instrument(skip(self))]
    pub async fn release(&mut self) -> Result<(), DbError> {
        let Some(mut connection) = self.connection.take() else {
            return Ok(());
        };
        let released: (bool,) = sqlx::query_as("SELECT pg_advisory_unlock($1)")
            .bind(self.key)
            .fetch_one(&mut *connection)
            .await?;

        if !released.0 {
            warn!(key = self.key, "⚠️ [LOCK]: release reported no lock held");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_snapshot_id_derives_same_key() {
        let id = Uuid::new_v4();
        assert_eq!(derive_lock_key(id), derive_lock_key(id));
    }

    #[test]
    fn different_snapshot_ids_overwhelmingly_derive_different_keys() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_ne!(derive_lock_key(a), derive_lock_key(b));
    }
}
