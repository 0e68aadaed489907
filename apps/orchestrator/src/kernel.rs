// [apps/orchestrator/src/kernel.rs]
/*!
 * APARATO: RAIZ DE COMPOSICION
 * RESPONSABILIDAD: Conectar el pool de consultas, construir el
 * despachador de roles y el estado compartido, y lanzar el unico
 * daemon de fondo del sistema (el supervisor del Oyente de Cambios,
 * C5) junto al servidor HTTP (SPEC_FULL.md §2).
 */

use crate::config::Config;
use crate::routes::create_router;
use crate::services::listener;
use crate::state::AppState;
use snapcast_domain_models::Role;
use snapcast_domain_providers::RoleDispatcher;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{error, info, instrument};

const DISPATCHED_ROLES: [Role; 4] = [
    Role::Strategist,
    Role::Briefer,
    Role::Consolidator,
    Role::Holiday,
];

pub struct OrchestratorKernel {
    pub server_network_port: u16,
    pub application_state: AppState,
}

impl OrchestratorKernel {
    /// Conecta el pool de Postgres y construye el despachador de roles
    /// desde el entorno — falla rapido si algun rol necesario no tiene
    /// modelo configurado (SPEC_FULL.md §7, `ConfigMissing`).
    #[instrument(skip(config))]
    pub async fn ignite(config: Config) -> Self {
        let config = Arc::new(config);

        let pool = snapcast_infra_db::connect_pool(&config.database_url, config.max_pool_connections)
            .await
            .expect("FATAL: no se pudo establecer el pool de conexiones Postgres");

        let dispatcher = RoleDispatcher::from_env(&DISPATCHED_ROLES)
            .expect("FATAL: configuracion de rol incompleta, no se puede iniciar el despachador");

        let server_network_port = config.server_network_port;
        let application_state = AppState::new(pool, dispatcher, config);

        Self {
            server_network_port,
            application_state,
        }
    }

    /// Lanza el supervisor del Oyente de Cambios como una tarea
    /// independiente de larga vida, luego sirve HTTP hasta que el
    /// proceso termine (SPEC_FULL.md §4.5).
    pub async fn launch(self) {
        let listener_state = self.application_state.clone();
        tokio::spawn(async move {
            listener::run(listener_state).await;
        });

        let router = create_router(self.application_state);

        let bind_address = SocketAddr::new(
            "0.0.0.0".parse::<IpAddr>().expect("loopback-all address always parses"),
            self.server_network_port,
        );

        info!(%bind_address, "🚀 [KERNEL]: orchestrator listening");

        let tcp_listener = tokio::net::TcpListener::bind(bind_address)
            .await
            .expect("FATAL: no se pudo enlazar el puerto de red");

        if let Err(err) = axum::serve(tcp_listener, router).await {
            error!(error = %err, "💀 [KERNEL]: server loop terminated");
            std::process::exit(1);
        }
    }
}
