// [apps/orchestrator/src/services/briefer.rs]
/*!
 * APARATO: RUNNER DEL BRIEFER (C2b)
 * RESPONSABILIDAD: Ensamblar la fila de briefing de seis campos mas
 * citas a partir de una llamada primaria estructurada y cuatro
 * llamadas secundarias de enriquecimiento (eventos, trafico, cierres
 * escolares, noticias), cada una con su propia contencion de fallo
 * (spec.md §4.2 parrafo 2). El ensamblaje completo se ejecuta tras el
 * candado de vuelo unico por snapshot (C8) para que llamadas
 * concurrentes sobre el mismo snapshot compartan un resultado en vez
 * de duplicar la consulta al proveedor.
 *
 * Mapeo de las cuatro llamadas secundarias a los seis campos
 * canonicos (decision documentada en DESIGN.md, el texto de la
 * especificacion no ata una al otro de forma inequivoca):
 * eventos -> events_nearby, trafico -> local_traffic,
 * cierres escolares -> weather_impacts, noticias -> rideshare_intel.
 * `global_travel`/`domestic_travel` solo los puebla la llamada
 * primaria.
 */

use crate::state::AppState;
use futures::FutureExt;
use snapcast_domain_models::{BriefingRow, DispatchOutcome, DispatchRequest, Role, Snapshot};
use snapcast_infra_db::repositories::BriefingRepository;
use tracing::{info, warn};
use uuid::Uuid;

const PRIMARY_SYSTEM_PROMPT: &str = "Eres un analista de inteligencia de viaje para conductores de \
rideshare. Responde exclusivamente con un objeto JSON de las claves global_travel, domestic_travel, \
local_traffic, weather_impacts, events_nearby, rideshare_intel — cada una una cadena breve — y una \
clave citations con un arreglo de URLs.";

async fn dispatch_text(state: &AppState, system_prompt: &str, user_prompt: String) -> String {
    let request = DispatchRequest {
        role: Role::Briefer,
        system_prompt: system_prompt.to_string(),
        user_prompt,
        expects_json: false,
    };

    match state.dispatcher.dispatch(request).await {
        DispatchOutcome::Success { text, .. } => text.trim().to_string(),
        DispatchOutcome::Failure { error, .. } => {
            warn!(%error, "⚠️ [BRIEFER]: secondary enrichment call failed, using placeholder");
            String::new()
        }
    }
}

fn location_header(snapshot: &Snapshot) -> String {
    let place = snapshot
        .resolved_place
        .formatted_address
        .clone()
        .unwrap_or_else(|| "ubicacion desconocida".to_string());
    format!("Ubicacion: {place}\nHora local: {} ({})", snapshot.local_iso, snapshot.day_of_week)
}

async fn run_primary_call(state: &AppState, snapshot: &Snapshot) -> BriefingRow {
    let request = DispatchRequest {
        role: Role::Briefer,
        system_prompt: PRIMARY_SYSTEM_PROMPT.to_string(),
        user_prompt: location_header(snapshot),
        expects_json: true,
    };

    match state.dispatcher.dispatch(request).await {
        DispatchOutcome::Success { text, citations } => parse_primary_response(snapshot.snapshot_id, &text, citations),
        DispatchOutcome::Failure { error, .. } => {
            warn!(snapshot_id = %snapshot.snapshot_id, %error, "⚠️ [BRIEFER]: primary call failed");
            BriefingRow {
                snapshot_id: snapshot.snapshot_id,
                ..Default::default()
            }
        }
    }
}

/// Si la respuesta primaria no es JSON valido, todo el texto se
/// almacena en `local_traffic` y el resto de los campos quedan vacios
/// (spec.md §4.2, regla de fallback de parseo).
fn parse_primary_response(snapshot_id: Uuid, raw: &str, citations: Vec<String>) -> BriefingRow {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => {
            let field = |key: &str| value.get(key).and_then(|v| v.as_str()).unwrap_or("").to_string();
            BriefingRow {
                snapshot_id,
                global_travel: field("global_travel"),
                domestic_travel: field("domestic_travel"),
                local_traffic: field("local_traffic"),
                weather_impacts: field("weather_impacts"),
                events_nearby: field("events_nearby"),
                rideshare_intel: field("rideshare_intel"),
                citations,
                updated_at: None,
            }
        }
        Err(err) => {
            warn!(%err, "⚠️ [BRIEFER]: primary response was not valid JSON, storing raw text");
            BriefingRow {
                snapshot_id,
                local_traffic: raw.to_string(),
                citations,
                ..Default::default()
            }
        }
    }
}

async fn run_secondary_fanout(state: &AppState, snapshot: &Snapshot) -> BriefingRow {
    let header = location_header(snapshot);

    let events = dispatch_text(state, "Lista brevemente eventos cercanos relevantes hoy.", header.clone());
    let traffic = dispatch_text(state, "Describe brevemente las condiciones de trafico local actuales.", header.clone());
    let school_closures = dispatch_text(state, "Indica brevemente cierres escolares relevantes, si los hay.", header.clone());
    let news = dispatch_text(state, "Resume brevemente noticias locales relevantes para un conductor de rideshare.", header);

    let (events, traffic, school_closures, news) = tokio::join!(events, traffic, school_closures, news);

    BriefingRow {
        snapshot_id: snapshot.snapshot_id,
        events_nearby: events,
        local_traffic: traffic,
        weather_impacts: school_closures,
        rideshare_intel: news,
        ..Default::default()
    }
}

async fn assemble_briefing(state: AppState, snapshot: Snapshot) -> BriefingRow {
    let primary = run_primary_call(&state, &snapshot).await;
    let secondary = run_secondary_fanout(&state, &snapshot).await;
    BriefingRow::merge(&primary, &secondary)
}

/// Ejecuta el runner del Briefer para `snapshot_id`, coalesciendo
/// llamadas concurrentes sobre el mismo snapshot via el candado de
/// vuelo unico (C8), y fusionando el resultado ensamblado con
/// cualquier fila ya persistida antes de escribir (smart-merge,
/// SPEC_FULL.md §9).
pub async fn run_briefing(state: AppState, snapshot: Snapshot) {
    let snapshot_id = snapshot.snapshot_id;
    let inflight = state.inflight.clone();

    let assembled = inflight
        .run_single_flight(snapshot_id, {
            let state = state.clone();
            move || assemble_briefing(state, snapshot).boxed()
        })
        .await;

    let repo = BriefingRepository::new(&state.pool);
    let existing = match repo.find(snapshot_id).await {
        Ok(existing) => existing,
        Err(err) => {
            warn!(%snapshot_id, error = %err, "⚠️ [BRIEFER]: failed to read existing briefing row before merge");
            None
        }
    };

    let final_row = match existing {
        Some(existing) => BriefingRow::merge(&existing, &assembled),
        None => (*assembled).clone(),
    };

    if let Err(err) = repo.upsert(snapshot_id, &final_row).await {
        warn!(%snapshot_id, error = %err, "🔥 [BRIEFER]: failed to persist briefing row");
        return;
    }

    info!(%snapshot_id, "✅ [BRIEFER]: briefing persisted");
}
