// [libs/infra/db/src/repositories/block_ranking.rs]
/*!
 * APARATO: BLOCK RANKING REPOSITORY
 * RESPONSABILIDAD: Unica escritura del lado de persistencia de bloques
 * que este sistema posee — el generador de venues aguas abajo que
 * consume esta fila queda fuera de alcance (spec.md §1). La insercion
 * es lo que dispara `notify_blocks_ready` (spec.md §4.7, §6).
 */

use crate::errors::DbError;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

pub struct BlockRankingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BlockRankingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Registra que la admision de bloques para `snapshot_id` quedo
    /// persistida, devolviendo el `ranking_id` generado.
    #[instrument(skip(self))]
    pub async fn record(&self, snapshot_id: Uuid) -> Result<Uuid, DbError> {
        let (ranking_id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO block_rankings (snapshot_id) VALUES ($1) RETURNING ranking_id",
        )
        .bind(snapshot_id)
        .fetch_one(self.pool)
        .await?;

        Ok(ranking_id)
    }
}
