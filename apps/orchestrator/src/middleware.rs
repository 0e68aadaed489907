// [apps/orchestrator/src/middleware.rs]
/*!
 * APARATO: GUARDIA DE SALUD PERIMETRAL
 * RESPONSABILIDAD: Rechazar trafico mutante mientras el proceso esta en
 * modo mantenimiento (`AppState::is_operational`). Autenticacion y
 * validacion de requests quedan explicitamente fuera del alcance de
 * este sistema (spec.md §1) — las aplica el colaborador externo que
 * enruta hacia este servicio.
 */

use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

pub async fn health_guard(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if let Err(reason) = state.is_operational() {
        warn!(%reason, "⛔ [HEALTH_GUARD]: rejecting request, maintenance active");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "ok": false,
                "error_code": "MAINTENANCE_ACTIVE",
                "error": reason,
            })),
        )
            .into_response();
    }
    next.run(req).await
}
