// [apps/orchestrator/src/bin/seed.rs]
/*!
 * APARATO: SEMBRADOR DE DESARROLLO
 * RESPONSABILIDAD: Insertar un Snapshot de muestra y su Strategy Row
 * pendiente, para poder ejercitar `POST /api/strategy/run/:id` contra
 * una base local recien migrada sin depender de un colaborador externo.
 */

use dotenvy::dotenv;
use snapcast_infra_db::connect_pool;
use sqlx::types::Json;
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("info,snapcast_infra_db=debug")
        .with_target(false)
        .init();

    info!("💠 [SEED]: hydrating a sample snapshot");

    let database_url =
        std::env::var("DATABASE_URL").expect("FATAL: DATABASE_URL is missing in environment");
    let pool = connect_pool(&database_url, 5).await?;

    let snapshot_id = Uuid::new_v4();
    let weather = Json(serde_json::json!({
        "temp_f": 58.0,
        "conditions": "light rain",
        "forecast": "clearing by evening",
    }));

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
    .bind(37.7749_f64)
    .bind(-122.4194_f64)
    .bind("San Francisco")
    .bind("CA")
    .bind("US")
    .bind("San Francisco, CA, USA")
    .bind("America/Los_Angeles")
    .bind("2026-07-28T17:30:00-07:00")
    .bind("Tuesday")
    .bind("evening_rush")
    .bind(17_i32)
    .bind(weather)
    .bind(Option::<String>::None)
    .bind(false)
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO strategy_rows (snapshot_id, status, trigger_reason)
        VALUES ($1, 'pending', 'initial')
        ON CONFLICT (snapshot_id) DO NOTHING
        "#,
    )
    .bind(snapshot_id)
    .execute(&pool)
    .await?;

    info!(%snapshot_id, "✅ [SEED]: sample snapshot ready for POST /api/strategy/run/:id");
    Ok(())
}
