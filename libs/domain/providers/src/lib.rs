// [libs/domain/providers/src/lib.rs]
/*!
 * =================================================================
 * APARATO: ROLE DISPATCHER ROOT (C1)
 * CLASIFICACIÓN: DOMAIN SERVICE (ESTRATO L2)
 * RESPONSABILIDAD: MAPEO DE UN ROL LOGICO A UN PROVEEDOR CONCRETO Y
 * NORMALIZACION DEL SOBRE DE RESULTADO
 *
 * El despachador nunca conoce snapshots, filas de estrategia, ni SSE —
 * su unico contrato es `dispatch(role, request) -> DispatchOutcome`.
 * Los detalles especificos de cada proveedor (que parametros acepta,
 * como limpia su salida JSON) viven en `variants`, nunca aqui.
 * =================================================================
 */

pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod json_cleanup;
pub mod retry;
pub mod variants;

pub use config::RoleConfig;
pub use dispatcher::RoleDispatcher;
pub use errors::ProviderError;
