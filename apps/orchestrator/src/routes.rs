// [apps/orchestrator/src/routes.rs]
/*!
 * APARATO: TOPOLOGIA DE RUTAS
 * RESPONSABILIDAD: Composicion del router raiz a partir de los tres
 * estratos de la superficie HTTP de spec.md §6 — admision de bloques,
 * control/consulta de estrategia, y los dos flujos SSE — mas `/health`
 * sin guardia (un balanceador debe poder sondearlo aun en mantenimiento).
 */

use crate::handlers::{blocks, events, strategy};
use crate::middleware::health_guard;
use crate::state::AppState;
use axum::{
    http::{header, Method, StatusCode},
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

pub fn create_router(application_shared_state: AppState) -> Router {
    let network_security_shield = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let strategy_stratum = Router::new()
        .route("/seed", post(strategy::seed))
        .route("/run/:snapshotId", post(strategy::run))
        .route("/history", get(strategy::history))
        .route("/briefing/:snapshotId", get(strategy::briefing))
        .route("/:snapshotId/retry", post(strategy::retry))
        .route("/:snapshotId", get(strategy::get));

    let api_stratum = Router::new()
        .route("/blocks", post(blocks::create_blocks))
        .nest("/strategy", strategy_stratum)
        .layer(middleware::from_fn_with_state(
            application_shared_state.clone(),
            health_guard,
        ));

    let events_stratum = Router::new()
        .route("/strategy", get(events::strategy_events))
        .route("/blocks", get(events::blocks_events));

    Router::new()
        .route("/health", get(|| async { (StatusCode::OK, "ok") }))
        .nest("/api", api_stratum)
        .nest("/events", events_stratum)
        .layer(network_security_shield)
        .with_state(application_shared_state)
}
