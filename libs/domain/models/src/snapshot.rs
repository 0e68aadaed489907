// [libs/domain/models/src/snapshot.rs]
/*!
 * APARATO: SNAPSHOT ENTITY
 * RESPONSABILIDAD: Representación inmutable de un contexto de conductor
 * en un instante dado (coordenadas, lugar resuelto, hora local, clima,
 * proximidad aeroportuaria, feriado).
 *
 * El Snapshot es propiedad exclusiva del almacén de snapshots externo;
 * este estrato solo lo lee, salvo el parche de `holiday`/`is_holiday`
 * que realiza el runner de feriados (C2c) y la copia que genera el
 * Controlador de Reintento (C9).
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ResolvedPlace {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub formatted_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Weather {
    pub temp_f: f64,
    pub conditions: String,
    pub forecast: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AirportContext {
    pub code: String,
    pub distance_miles: f64,
    pub delay_minutes: Option<i32>,
}

/// Identidad de una corrida de tubería: inmutable tras su creación.
///
/// Invariante: todo campo esta presente o explicitamente nulo;
/// `lat`, `lng` y `timezone` son obligatorios para cualquier corrida.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub snapshot_id: Uuid,
    pub coordinates: Coordinates,
    pub resolved_place: ResolvedPlace,
    pub timezone: String,
    pub local_iso: String,
    pub day_of_week: String,
    pub day_part_key: String,
    pub hour: i32,
    pub weather: Option<Weather>,
    pub airport_context: Option<AirportContext>,
    pub holiday: Option<String>,
    pub is_holiday: bool,
    pub trigger_reason: crate::strategy::TriggerReason,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    /// Formateador único de "hoy" en la zona horaria propia del snapshot,
    /// nunca en la hora local del servidor — usado por el Controlador
    /// de Reintento al recomputar `date` para la copia nueva.
    pub fn local_date(&self) -> String {
        self.local_iso
            .split('T')
            .next()
            .unwrap_or(&self.local_iso)
            .to_string()
    }
}

/// Bucket de franja horaria para un reintento que recomputa la hora
/// actual en la zona propia del snapshot (ver Controlador de Reintento,
/// SPEC_FULL.md §4.9). No intenta reproducir la clasificacion original
/// del almacen externo de snapshots, solo aproximarla.
pub fn day_part_key_for_hour(hour: i32) -> &'static str {
    match hour {
        5..=11 => "morning",
        12..=16 => "afternoon",
        17..=20 => "evening",
        _ => "night",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_part_buckets_cover_the_full_day() {
        assert_eq!(day_part_key_for_hour(0), "night");
        assert_eq!(day_part_key_for_hour(8), "morning");
        assert_eq!(day_part_key_for_hour(14), "afternoon");
        assert_eq!(day_part_key_for_hour(19), "evening");
        assert_eq!(day_part_key_for_hour(23), "night");
    }
}
