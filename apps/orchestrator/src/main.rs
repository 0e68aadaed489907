// [apps/orchestrator/src/main.rs]
/*!
 * APARATO: PUNTO DE ENTRADA DEL BINARIO
 * RESPONSABILIDAD: Carga de entorno, inicializacion de trazas,
 * construccion del runtime de Tokio con pila ampliada, e ignicion del
 * Kernel (SPEC_FULL.md §2).
 */

use dotenvy::dotenv;
use snapcast_orchestrator::config::Config;
use snapcast_orchestrator::kernel::OrchestratorKernel;
use snapcast_shared_telemetry::init_tracing;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing("snapcast_orchestrator");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_stack_size(4 * 1024 * 1024)
        .build()?;

    runtime.block_on(async {
        info!("🛰️  [KERNEL]: ignition sequence starting");

        let config = Config::from_env().expect("FATAL: configuracion de entorno invalida");
        let kernel = OrchestratorKernel::ignite(config).await;

        info!(port = kernel.server_network_port, "🚀 [KERNEL]: system operational");
        kernel.launch().await;
    });

    Ok(())
}
