// [apps/orchestrator/tests/support/mod.rs]
//! Fixtures compartidas por los escenarios de extremo a extremo S1-S6
//! (spec.md §8). Cada prueba que usa este modulo corre contra un
//! `sqlx::PgPool` real apuntando a `DATABASE_URL`, con el esquema ya
//! aplicado — no hay variantes de proveedor reales en juego: estas
//! pruebas simulan la escritura que cada runner de C2 habria producido
//! y ejercitan la capa de persistencia/admision/proyeccion tal cual la
//! usan los handlers HTTP.

use snapcast_domain_providers::RoleDispatcher;
use snapcast_domain_models::Role;
use snapcast_infra_db::{apply_schema, connect_pool};
use snapcast_orchestrator::config::Config;
use snapcast_orchestrator::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

const DISPATCHED_ROLES: [Role; 4] =
    [Role::Strategist, Role::Briefer, Role::Consolidator, Role::Holiday];

/// `None` cuando `DATABASE_URL` no esta definido — el llamador debe
/// retornar temprano en ese caso (las pruebas igual llevan `#[ignore]`,
/// esta es la segunda guarda que sigue la convencion sqlx habitual).
pub async fn test_pool() -> Option<PgPool> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let pool = connect_pool(&database_url, 5).await.expect("pool construido");
    apply_schema(&pool).await.expect("esquema aplicado");
    Some(pool)
}

/// Construye un `AppState` completo contra el pool de prueba. El
/// despachador resuelve su configuracion con modelos ficticios — ningun
/// escenario aqui invoca `dispatcher.dispatch`, asi que nunca hay una
/// llamada de red real.
pub fn test_state(pool: PgPool) -> AppState {
    for role in DISPATCHED_ROLES {
        std::env::set_var(format!("STRATEGY_{}", role.env_key_fragment()), "gpt-4o-mini");
    }
    let dispatcher = RoleDispatcher::from_env(&DISPATCHED_ROLES).expect("dispatcher construido");

    let config = Arc::new(Config {
        database_url: String::new(),
        listener_database_url: String::new(),
        max_pool_connections: 5,
        server_network_port: 0,
        blocks_concurrency: 4,
        blocks_timeout_ms: 30_000,
        sse_subscriber_soft_cap: 100,
        sse_subscriber_queue_depth: 16,
    });

    AppState::new(pool, dispatcher, config)
}

/// Inserta un snapshot de muestra listo para ser admitido, en
/// `America/Chicago`, sin feriado, tal como el escenario S1 de
/// spec.md §8 describe.
pub async fn insert_snapshot(pool: &PgPool, snapshot_id: Uuid, city: &str, timezone: &str) {
    sqlx::query(
        r#"
        INSERT INTO snapshots (
            snapshot_id, lat, lng, city, state, country, formatted_address,
            timezone, local_iso, day_of_week, day_part_key, hour, weather,
            holiday, is_holiday, trigger_reason
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, 'initial')
        ON CONFLICT (snapshot_id) DO NOTHING
        "#,
    )
    .bind(snapshot_id)
    .bind(33.1507_f64)
    .bind(-96.8236_f64)
    .bind(city)
    .bind("TX")
    .bind("US")
    .bind(format!("{city}, TX, USA"))
    .bind(timezone)
    .bind("2026-07-28T19:15:00-05:00")
    .bind("Tuesday")
    .bind("evening_rush")
    .bind(19_i32)
    .bind(sqlx::types::Json(serde_json::json!({"temp_f": 58.0, "conditions": "clear"})))
    .bind(Option::<String>::None)
    .bind(false)
    .execute(pool)
    .await
    .expect("snapshot insertado");
}

/// Limpia las filas que una prueba sembro, identificadas por
/// `snapshot_id` — las pruebas de este directorio nunca comparten ids,
/// asi que no hace falta un `TRUNCATE` global entre corridas.
pub async fn cleanup(pool: &PgPool, snapshot_id: Uuid) {
    let _ = sqlx::query("DELETE FROM block_rankings WHERE snapshot_id = $1")
        .bind(snapshot_id)
        .execute(pool)
        .await;
    let _ = sqlx::query("DELETE FROM triad_jobs WHERE snapshot_id = $1")
        .bind(snapshot_id)
        .execute(pool)
        .await;
    let _ = sqlx::query("DELETE FROM briefing_rows WHERE snapshot_id = $1")
        .bind(snapshot_id)
        .execute(pool)
        .await;
    let _ = sqlx::query("DELETE FROM strategy_rows WHERE snapshot_id = $1")
        .bind(snapshot_id)
        .execute(pool)
        .await;
    let _ = sqlx::query("DELETE FROM snapshots WHERE snapshot_id = $1")
        .bind(snapshot_id)
        .execute(pool)
        .await;
}
