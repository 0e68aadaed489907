// [libs/domain/models/src/briefing.rs]
/*!
 * APARATO: BRIEFING ROW ENTITY
 * RESPONSABILIDAD: Salida estructurada del Briefer (C2b), clave por
 * `snapshot_id`, 1:1. Ausencia de la fila equivale a "briefer no ha
 * completado para ese snapshot" — ver invariante en SPEC_FULL.md §3.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BriefingRow {
    pub snapshot_id: Uuid,
    pub global_travel: String,
    pub domestic_travel: String,
    pub local_traffic: String,
    pub weather_impacts: String,
    pub events_nearby: String,
    pub rideshare_intel: String,
    pub citations: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BriefingRow {
    pub fn is_empty_stub(&self) -> bool {
        self.global_travel.trim().is_empty()
            && self.domestic_travel.trim().is_empty()
            && self.local_traffic.trim().is_empty()
            && self.weather_impacts.trim().is_empty()
            && self.events_nearby.trim().is_empty()
            && self.rideshare_intel.trim().is_empty()
    }

    /// La serialización rol-pura usada por el Consolidador (C6): solo el
    /// contenido, nunca metadatos de snapshot crudo.
    pub fn role_pure_serialization(&self) -> String {
        serde_json::json!({
            "global_travel": self.global_travel,
            "domestic_travel": self.domestic_travel,
            "local_traffic": self.local_traffic,
            "weather_impacts": self.weather_impacts,
            "events_nearby": self.events_nearby,
            "rideshare_intel": self.rideshare_intel,
        })
        .to_string()
    }

    /// Regla de fusión inteligente (smart-merge), puesta aquí como la
    /// función pura y testeable que SPEC_FULL.md §9 pide: reemplaza un
    /// campo solo si el valor entrante es no vacío / no stub, de lo
    /// contrario preserva el valor existente. Nunca hace transicionar un
    /// campo de no-vacío a vacío (invariante testeable #5).
    pub fn merge(existing: &BriefingRow, incoming: &BriefingRow) -> BriefingRow {
        fn pick(existing: &str, incoming: &str) -> String {
            if incoming.trim().is_empty() {
                existing.to_string()
            } else {
                incoming.to_string()
            }
        }

        BriefingRow {
            snapshot_id: existing.snapshot_id,
            global_travel: pick(&existing.global_travel, &incoming.global_travel),
            domestic_travel: pick(&existing.domestic_travel, &incoming.domestic_travel),
            local_traffic: pick(&existing.local_traffic, &incoming.local_traffic),
            weather_impacts: pick(&existing.weather_impacts, &incoming.weather_impacts),
            events_nearby: pick(&existing.events_nearby, &incoming.events_nearby),
            rideshare_intel: pick(&existing.rideshare_intel, &incoming.rideshare_intel),
            citations: if incoming.citations.is_empty() {
                existing.citations.clone()
            } else {
                incoming.citations.clone()
            },
            updated_at: incoming.updated_at.or(existing.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(local_traffic: &str) -> BriefingRow {
        BriefingRow {
            local_traffic: local_traffic.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn merge_preserves_existing_field_when_incoming_is_empty() {
        let existing = row("I-35 backed up near downtown");
        let incoming = row("");
        let merged = BriefingRow::merge(&existing, &incoming);
        assert_eq!(merged.local_traffic, "I-35 backed up near downtown");
    }

    #[test]
    fn merge_replaces_field_when_incoming_is_non_empty() {
        let existing = row("stale reading");
        let incoming = row("fresh reading");
        let merged = BriefingRow::merge(&existing, &incoming);
        assert_eq!(merged.local_traffic, "fresh reading");
    }

    #[test]
    fn merge_never_regresses_non_empty_to_empty() {
        let mut existing = BriefingRow::default();
        for update in ["first pass", "", "second pass", ""] {
            let incoming = row(update);
            existing = BriefingRow::merge(&existing, &incoming);
            assert!(!existing.local_traffic.is_empty());
        }
        assert_eq!(existing.local_traffic, "second pass");
    }
}
