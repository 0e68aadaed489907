// [libs/domain/models/src/envelope.rs]
/*!
 * APARATO: ROLE & DISPATCH ENVELOPE
 * RESPONSABILIDAD: El contrato logico compartido entre el Orquestador y
 * el Despachador de Roles (C1): que roles existen y la forma del
 * resultado de una invocacion de proveedor.
 *
 * El sobre legado `{ok, output, citations, error}` de SPEC_FULL.md §4.1
 * se deriva de `DispatchOutcome` en la frontera HTTP/log; internamente
 * el tipo suma dirige las decisiones de reintento sin adivinar a partir
 * de subcadenas de error (ver SPEC_FULL.md §9).
 */

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Strategist,
    Briefer,
    Consolidator,
    VenueGenerator,
    Holiday,
}

impl Role {
    /// Nombre en mayusculas usado para resolver claves de configuracion
    /// `STRATEGY_<ROLE>`.
    pub fn env_key_fragment(self) -> &'static str {
        match self {
            Role::Strategist => "STRATEGIST",
            Role::Briefer => "BRIEFER",
            Role::Consolidator => "CONSOLIDATOR",
            Role::VenueGenerator => "VENUE_GENERATOR",
            Role::Holiday => "HOLIDAY",
        }
    }

    /// Roles para los que el despachador habilita la herramienta de
    /// busqueda en vivo del proveedor por defecto.
    pub fn is_search_enabled_by_default(self) -> bool {
        matches!(self, Role::Briefer | Role::Consolidator)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub role: Role,
    pub system_prompt: String,
    pub user_prompt: String,
    /// Si el llamador espera una respuesta JSON (afecta la limpieza de
    /// salida para la familia Gemini).
    pub expects_json: bool,
}

/// Sum type del resultado de una invocacion de proveedor. `transient`
/// en `Failure` es la senal que dirige la logica de reintento — ver
/// SPEC_FULL.md §4.10 y §9.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DispatchOutcome {
    Success {
        text: String,
        citations: Vec<String>,
    },
    Failure {
        error: String,
        transient: bool,
    },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success { .. })
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            DispatchOutcome::Success { text, .. } => Some(text),
            DispatchOutcome::Failure { .. } => None,
        }
    }

    /// Proyeccion al sobre legado `{ok, output, citations, error}` de
    /// spec.md §4.1, usada cuando el resultado cruza hacia capas que
    /// esperan la forma JSON plana historica.
    pub fn to_legacy_envelope(&self) -> serde_json::Value {
        match self {
            DispatchOutcome::Success { text, citations } => serde_json::json!({
                "ok": true,
                "output": text,
                "citations": citations,
            }),
            DispatchOutcome::Failure { error, .. } => serde_json::json!({
                "ok": false,
                "error": error,
            }),
        }
    }
}
