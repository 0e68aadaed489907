// [apps/orchestrator/src/state/mod.rs]
/*!
 * APARATO: ESTADO COMPARTIDO DEL PROCESO
 * RESPONSABILIDAD: Composicion del estado inyectado a cada handler via
 * `axum::extract::State` — el pool de conexiones, el despachador de
 * roles, el difusor de eventos SSE y las dos caches de proceso
 * (idempotencia, vuelo unico). Todo campo es barato de clonar (`Arc`
 * o tipos ya internamente compartidos), como exige el patron `State`
 * de axum.
 */

pub mod event_bus;
pub mod idempotency;
pub mod inflight;

use crate::config::Config;
use crate::services::limiter::BoundedPool;
use event_bus::EventBus;
use idempotency::IdempotencyCache;
use inflight::InflightCache;
use snapcast_domain_providers::RoleDispatcher;
use sqlx::PgPool;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{info, warn};

/// Modo de salud consultado por `middleware::health_guard` antes de
/// admitir trafico mutante (SPEC_FULL.md §9, patron heredado del
/// kernel original).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemMode {
    Operational,
    Maintenance(String),
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub dispatcher: Arc<RoleDispatcher>,
    pub event_bus: Arc<EventBus>,
    pub idempotency: Arc<IdempotencyCache>,
    pub inflight: Arc<InflightCache>,
    pub blocks_pool: Arc<BoundedPool>,
    pub config: Arc<Config>,
    current_system_mode: Arc<RwLock<SystemMode>>,
}

impl AppState {
    pub fn new(pool: PgPool, dispatcher: RoleDispatcher, config: Arc<Config>) -> Self {
        let blocks_pool = BoundedPool::new(
            config.blocks_concurrency,
            Duration::from_millis(config.blocks_timeout_ms),
        );

        Self {
            pool,
            dispatcher: Arc::new(dispatcher),
            event_bus: Arc::new(EventBus::new(
                config.sse_subscriber_soft_cap,
                config.sse_subscriber_queue_depth,
            )),
            idempotency: Arc::new(IdempotencyCache::new(chrono::Duration::seconds(60))),
            inflight: Arc::new(InflightCache::new()),
            blocks_pool: Arc::new(blocks_pool),
            config,
            current_system_mode: Arc::new(RwLock::new(SystemMode::Operational)),
        }
    }

    pub fn set_mode(&self, target: SystemMode) {
        match self.current_system_mode.write() {
            Ok(mut guard) => {
                info!(?target, "🔄 [STATE]: transitioning system mode");
                *guard = target;
            }
            Err(poisoned) => {
                tracing::error!("lock poisoned while setting system mode: {poisoned}");
            }
        }
    }

    pub fn is_operational(&self) -> Result<(), String> {
        let guard = self
            .current_system_mode
            .read()
            .map_err(|e| format!("lock poisoned: {e}"))?;

        match &*guard {
            SystemMode::Operational => Ok(()),
            SystemMode::Maintenance(reason) => {
                warn!(%reason, "⛔ [HEALTH_GUARD]: rejecting request, maintenance active");
                Err(reason.clone())
            }
        }
    }
}
