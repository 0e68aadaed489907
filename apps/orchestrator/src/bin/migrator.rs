// [apps/orchestrator/src/bin/migrator.rs]
/*!
 * APARATO: CLI DE MIGRACION
 * RESPONSABILIDAD: Aplicar el esquema de base de datos (tablas,
 * disparadores de notificacion, indices) contra la URL de Postgres del
 * entorno (SPEC_FULL.md §3). Pensado para correr una vez por despliegue,
 * separado del proceso del servidor.
 */

use dotenvy::dotenv;
use snapcast_infra_db::{apply_schema, connect_pool};
use snapcast_shared_telemetry::init_tracing;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing("snapcast_migrator");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_stack_size(4 * 1024 * 1024)
        .build()?;

    runtime.block_on(async {
        info!("🚀 [MIGRATOR]: starting structural audit");

        let database_url = std::env::var("DATABASE_URL")
            .expect("FATAL: DATABASE_URL undefined in environment");

        let pool = connect_pool(&database_url, 5).await?;

        match apply_schema(&pool).await {
            Ok(()) => {
                info!("✨ [MIGRATOR]: schema is level and certified");
                Ok(())
            }
            Err(schema_fault) => {
                error!(error = %schema_fault, "💀 [MIGRATOR]: fatal schema error");
                std::process::exit(1);
            }
        }
    })
}
