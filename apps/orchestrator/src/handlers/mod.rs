// [apps/orchestrator/src/handlers/mod.rs]
/*!
 * APARATO: ADAPTADORES HTTP
 * RESPONSABILIDAD: Un modulo por area de la superficie HTTP de
 * SPEC_FULL.md §6 — admision de bloques (`blocks`), consulta y control
 * de la tuberia de estrategia (`strategy`), y los dos flujos SSE
 * (`events`).
 */

pub mod blocks;
pub mod events;
pub mod strategy;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Resuelve la clave de idempotencia de una peticion mutante: el header
/// `Idempotency-Key` si el cliente lo envio, o un hash de la ruta mas el
/// cuerpo en caso contrario (spec.md §4.8).
pub fn resolve_idempotency_key(explicit_header: Option<&str>, path: &str, body: &str) -> String {
    if let Some(key) = explicit_header {
        return key.to_string();
    }

    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    body.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}
