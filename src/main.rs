// --- Armador de horarios - Archivo principal ---

use std::sync::Arc;

use timetable::storage::{SnapshotStore, SqliteStore};
use timetable::{run_server, AppConfig, AppState, ScheduleIndex, Timetable};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("=== Armador de horarios (API) ===");
    let config = AppConfig::from_env()?;

    // Sin catálogo no se atiende nada: se aborta antes de abrir el puerto.
    let index = match ScheduleIndex::load(config.catalog_path()) {
        Ok(idx) => Arc::new(idx),
        Err(e) => {
            error!("Couldn't get course data!! {}", e);
            return Err(e.into());
        }
    };

    let store: Box<dyn SnapshotStore + Send> = Box::new(SqliteStore::open(&config.db_path)?);
    let timetable = Timetable::open(index, config.term, store)?;

    run_server(&config.bind, AppState::new(timetable)).await?;
    Ok(())
}
