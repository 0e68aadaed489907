// [libs/infra/db/src/lib.rs]
/*!
 * =================================================================
 * APARATO: PERSISTENCE ADAPTER ROOT
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: CONSTRUCCIÓN DEL POOL, CANDADOS DE ASESORIA,
 * OYENTE DE CAMBIOS, Y REPOSITORIOS POR ENTIDAD
 * =================================================================
 */

pub mod advisory_lock;
pub mod errors;
pub mod listener;
pub mod pool;
pub mod repositories;
pub mod schema;

pub use advisory_lock::AdvisoryLock;
pub use errors::DbError;
pub use listener::{ChangeListener, ListenerState};
pub use pool::connect_pool;
pub use schema::apply_schema;
