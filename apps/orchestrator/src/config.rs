// [apps/orchestrator/src/config.rs]
/*!
 * APARATO: CONFIGURACION TIPADA DEL PROCESO
 * RESPONSABILIDAD: Resolucion unica, en el arranque, de toda la
 * configuracion del proceso (SPEC_FULL.md §9) — en vez de llamadas
 * `env::var` dispersas por la logica de negocio, como hace el kernel
 * original, este estrato las centraliza en un `Config` tipado que se
 * construye una sola vez en `main` y se pasa hacia abajo. Desviacion
 * deliberada respecto al estilo del kernel original; documentada en
 * DESIGN.md.
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("[CONFIG_FAULT]: required environment variable {0} is undefined")]
    Missing(&'static str),
    #[error("[CONFIG_FAULT]: environment variable {0} could not be parsed: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// URL agrupada (pgbouncer/Supabase pooler) usada por el `PgPool`
    /// de consultas regulares.
    pub database_url: String,
    /// URL de sesion directa, sin agrupar, reservada para el Oyente de
    /// Cambios (C5) — rechazada en el arranque si apunta a un puerto de
    /// agrupador (SPEC_FULL.md §5).
    pub listener_database_url: String,
    pub max_pool_connections: u32,
    pub server_network_port: u16,
    pub blocks_concurrency: usize,
    pub blocks_timeout_ms: u64,
    pub sse_subscriber_soft_cap: usize,
    pub sse_subscriber_queue_depth: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require("DATABASE_URL")?;
        let listener_database_url =
            std::env::var("LISTENER_DATABASE_URL").unwrap_or_else(|_| database_url.clone());

        Ok(Self {
            database_url,
            listener_database_url,
            max_pool_connections: parse_or("MAX_POOL_CONNECTIONS", 10)?,
            server_network_port: parse_or("PORT", 8080)?,
            blocks_concurrency: parse_or("BLOCKS_CONCURRENCY", 4)?,
            blocks_timeout_ms: parse_or("BLOCKS_TIMEOUT_MS", 30_000)?,
            sse_subscriber_soft_cap: parse_or("SSE_SUBSCRIBER_SOFT_CAP", 100)?,
            sse_subscriber_queue_depth: parse_or("SSE_SUBSCRIBER_QUEUE_DEPTH", 16)?,
        })
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parse_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid(key, raw)),
        Err(_) => Ok(default),
    }
}
