// Biblioteca raíz del crate `timetable`.
// Reexporta los módulos principales: catálogo, parseo de bloques, estado de la
// selección, persistencia y la API HTTP.
pub mod algorithm;
pub mod api_json;
pub mod catalog;
pub mod config;
pub mod error;
pub mod grid;
pub mod models;
pub mod selection;
pub mod server;
pub mod storage;

pub use catalog::ScheduleIndex;
pub use config::AppConfig;
pub use error::{Result, TimetableError};
pub use selection::{Timetable, Totals};
/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::{run_server, AppState};
