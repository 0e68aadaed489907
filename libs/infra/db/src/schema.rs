// [libs/infra/db/src/schema.rs]
/*!
 * APARATO: ESQUEMA DE BASE DE DATOS
 * RESPONSABILIDAD: Creacion idempotente de las tablas, disparadores de
 * notificacion y indices que el resto de este crate asume presentes
 * (SPEC_FULL.md §3). Tres estratos, en orden: tablas base, funciones de
 * disparador de notificacion (que alimentan el Oyente de Cambios, C5),
 * e indices de aceleracion. Cada sentencia usa `IF NOT EXISTS` /
 * `CREATE OR REPLACE` para poder ejecutarse en cualquier entorno sin
 * distinguir primera corrida de repeticion.
 */

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::{debug, info, instrument};

const BASE_TABLES: &[(&str, &str)] = &[
    (
        "TABLE_SNAPSHOTS",
        r#"
        CREATE TABLE IF NOT EXISTS snapshots (
            snapshot_id UUID PRIMARY KEY,
            lat DOUBLE PRECISION NOT NULL,
            lng DOUBLE PRECISION NOT NULL,
            city TEXT,
            state TEXT,
            country TEXT,
            formatted_address TEXT,
            timezone TEXT NOT NULL,
            local_iso TEXT NOT NULL,
            day_of_week TEXT NOT NULL,
            day_part_key TEXT NOT NULL,
            hour INTEGER NOT NULL,
            weather JSONB,
            airport_context JSONB,
            holiday TEXT,
            is_holiday BOOLEAN NOT NULL DEFAULT false,
            trigger_reason TEXT NOT NULL DEFAULT 'initial',
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        "#,
    ),
    (
        "TABLE_STRATEGY_ROWS",
        r#"
        CREATE TABLE IF NOT EXISTS strategy_rows (
            snapshot_id UUID PRIMARY KEY REFERENCES snapshots(snapshot_id),
            minstrategy TEXT,
            consolidated_strategy TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            error_message TEXT,
            error_code TEXT,
            holiday TEXT,
            strategy_timestamp TIMESTAMPTZ,
            user_resolved_address TEXT,
            user_resolved_city TEXT,
            user_resolved_state TEXT,
            trigger_reason TEXT NOT NULL DEFAULT 'initial',
            user_id UUID,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        "#,
    ),
    (
        "TABLE_BRIEFING_ROWS",
        r#"
        CREATE TABLE IF NOT EXISTS briefing_rows (
            snapshot_id UUID PRIMARY KEY REFERENCES snapshots(snapshot_id),
            global_travel TEXT,
            domestic_travel TEXT,
            local_traffic TEXT,
            weather_impacts TEXT,
            events_nearby TEXT,
            rideshare_intel TEXT,
            citations JSONB NOT NULL DEFAULT '[]'::jsonb,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        "#,
    ),
    (
        "TABLE_TRIAD_JOBS",
        r#"
        CREATE TABLE IF NOT EXISTS triad_jobs (
            snapshot_id UUID PRIMARY KEY,
            kind TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'queued',
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        "#,
    ),
    (
        "TABLE_BLOCK_RANKINGS",
        r#"
        CREATE TABLE IF NOT EXISTS block_rankings (
            ranking_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            snapshot_id UUID NOT NULL REFERENCES snapshots(snapshot_id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );
        "#,
    ),
];

/// Funciones `pg_notify` mas los disparadores que las invocan — la
/// union entre las escrituras de `strategy_rows`/`block_rankings` y los
/// tres canales de `NotificationChannel` (SPEC_FULL.md §4.5, §4.7).
/// Ambas funciones sobre `strategy_rows` estan guardadas por columna:
/// sin eso, una escritura que no cambia nada observable (p.ej. el
/// `UPDATE` no-op que emite `mark_waiting_on_roles` en cada intento
/// fallido de consolidacion) re-dispara el oyente indefinidamente.
const NOTIFICATION_TRIGGERS: &[(&str, &str)] = &[
    (
        "FN_NOTIFY_STRATEGY_PROGRESS",
        r#"
        CREATE OR REPLACE FUNCTION notify_strategy_progress() RETURNS trigger AS $$
        BEGIN
            IF NEW.minstrategy IS DISTINCT FROM OLD.minstrategy
                OR NEW.consolidated_strategy IS DISTINCT FROM OLD.consolidated_strategy
                OR NEW.status IS DISTINCT FROM OLD.status
                OR NEW.holiday IS DISTINCT FROM OLD.holiday THEN
                PERFORM pg_notify('strategy_progress', json_build_object('snapshot_id', NEW.snapshot_id)::text);
            END IF;
            RETURN NEW;
        END;
        $$ LANGUAGE plpgsql;
        "#,
    ),
    (
        "TRG_NOTIFY_STRATEGY_PROGRESS",
        r#"
        DROP TRIGGER IF EXISTS trg_notify_strategy_progress ON strategy_rows;
        CREATE TRIGGER trg_notify_strategy_progress
            AFTER UPDATE ON strategy_rows
            FOR EACH ROW EXECUTE FUNCTION notify_strategy_progress();
        "#,
    ),
    (
        "FN_NOTIFY_STRATEGY_READY",
        r#"
        CREATE OR REPLACE FUNCTION notify_strategy_ready() RETURNS trigger AS $$
        BEGIN
            IF NEW.consolidated_strategy IS DISTINCT FROM OLD.consolidated_strategy
                AND coalesce(NEW.consolidated_strategy, '') <> '' THEN
                PERFORM pg_notify('strategy_ready', json_build_object('snapshot_id', NEW.snapshot_id)::text);
            END IF;
            RETURN NEW;
        END;
        $$ LANGUAGE plpgsql;
        "#,
    ),
    (
        "TRG_NOTIFY_STRATEGY_READY",
        r#"
        DROP TRIGGER IF EXISTS trg_notify_strategy_ready ON strategy_rows;
        CREATE TRIGGER trg_notify_strategy_ready
            AFTER UPDATE ON strategy_rows
            FOR EACH ROW EXECUTE FUNCTION notify_strategy_ready();
        "#,
    ),
    (
        "FN_NOTIFY_BLOCKS_READY",
        r#"
        CREATE OR REPLACE FUNCTION notify_blocks_ready() RETURNS trigger AS $$
        BEGIN
            PERFORM pg_notify('blocks_ready', json_build_object(
                'snapshot_id', NEW.snapshot_id,
                'ranking_id', NEW.ranking_id
            )::text);
            RETURN NEW;
        END;
        $$ LANGUAGE plpgsql;
        "#,
    ),
    (
        "TRG_NOTIFY_BLOCKS_READY",
        r#"
        DROP TRIGGER IF EXISTS trg_notify_blocks_ready ON block_rankings;
        CREATE TRIGGER trg_notify_blocks_ready
            AFTER INSERT ON block_rankings
            FOR EACH ROW EXECUTE FUNCTION notify_blocks_ready();
        "#,
    ),
];

const ACCELERATION_INDEXES: &[(&str, &str)] = &[
    (
        "IDX_STRATEGY_ROWS_STATUS",
        "CREATE INDEX IF NOT EXISTS idx_strategy_rows_status ON strategy_rows(status);",
    ),
    (
        "IDX_STRATEGY_ROWS_USER",
        "CREATE INDEX IF NOT EXISTS idx_strategy_rows_user ON strategy_rows(user_id, created_at DESC);",
    ),
    (
        "IDX_TRIAD_JOBS_STATUS",
        "CREATE INDEX IF NOT EXISTS idx_triad_jobs_status ON triad_jobs(status);",
    ),
    (
        "IDX_BLOCK_RANKINGS_SNAPSHOT",
        "CREATE INDEX IF NOT EXISTS idx_block_rankings_snapshot ON block_rankings(snapshot_id);",
    ),
];

/// Aplica los tres estratos del esquema en orden: tablas, disparadores
/// de notificacion, indices. Seguro de ejecutar en cualquier entorno,
/// cualquier numero de veces.
#[instrument(skip(pool))]
pub async fn apply_schema(pool: &PgPool) -> Result<()> {
    info!("🏗️ [SCHEMA]: synchronizing structural strata");

    solidify_tables(pool).await?;
    install_notification_triggers(pool).await?;
    harden_indexes(pool).await?;

    info!("✅ [SCHEMA]: strata level and certified");
    Ok(())
}

async fn solidify_tables(pool: &PgPool) -> Result<()> {
    for (identifier, sql) in BASE_TABLES {
        debug!("  ↳ solidifying: {identifier}");
        sqlx::query(sql)
            .execute(pool)
            .await
            .with_context(|| format!("CRITICAL_SOLIDIFICATION_FAULT: {identifier}"))?;
    }
    Ok(())
}

async fn install_notification_triggers(pool: &PgPool) -> Result<()> {
    for (identifier, sql) in NOTIFICATION_TRIGGERS {
        debug!("  ↳ installing: {identifier}");
        sqlx::query(sql)
            .execute(pool)
            .await
            .with_context(|| format!("CRITICAL_TRIGGER_FAULT: {identifier}"))?;
    }
    Ok(())
}

async fn harden_indexes(pool: &PgPool) -> Result<()> {
    for (identifier, sql) in ACCELERATION_INDEXES {
        debug!("  ↳ hardening: {identifier}");
        sqlx::query(sql)
            .execute(pool)
            .await
            .with_context(|| format!("CRITICAL_HARDENING_FAULT: {identifier}"))?;
    }
    Ok(())
}
