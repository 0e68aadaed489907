// [apps/orchestrator/src/lib.rs]
/*!
 * APARATO: RAIZ DE LA LIBRERIA DEL ORQUESTADOR
 * RESPONSABILIDAD: Arbol de modulos compartido entre el binario
 * `orchestrator` y los binarios auxiliares `migrator`/`seed`.
 */

pub mod config;
pub mod errors;
pub mod handlers;
pub mod kernel;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::kernel::OrchestratorKernel;
    pub use crate::state::AppState;
    pub use crate::state::SystemMode;
}
