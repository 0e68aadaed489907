// [libs/infra/db/src/repositories/mod.rs]
/*!
 * APARATO: REPOSITORY REGISTRY
 * RESPONSABILIDAD: Un repositorio por entidad del modelo de datos,
 * cada uno envolviendo el `PgPool` compartido.
 */

pub mod block_ranking;
pub mod briefing;
pub mod snapshot;
pub mod strategy;
pub mod triad_job;

pub use block_ranking::BlockRankingRepository;
pub use briefing::BriefingRepository;
pub use snapshot::SnapshotRepository;
pub use strategy::StrategyRepository;
pub use triad_job::TriadJobRepository;
