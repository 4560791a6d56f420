//! Configuración por variables de entorno (se lee `.env` si existe).
//!
//! | Variable              | Por defecto          |
//! |-----------------------|----------------------|
//! | `TIMETABLE_YEAR`      | `111`                |
//! | `TIMETABLE_SEMESTER`  | `2`                  |
//! | `TIMETABLE_DATA_DIR`  | `course_data`        |
//! | `TIMETABLE_DB_PATH`   | `data/timetable.db`  |
//! | `TIMETABLE_BIND`      | `127.0.0.1:8080`     |

use std::env;
use std::path::PathBuf;

use crate::error::{Result, TimetableError};
use crate::models::AcademicTerm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub term: AcademicTerm,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub bind: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una función de búsqueda inyectada.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str, default: u32| -> Result<u32> {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => v
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| TimetableError::Config(format!("{} debe ser un entero, se recibió '{}'", key, v))),
                _ => Ok(default),
            }
        };
        let text = |key: &str, default: &str| -> String {
            lookup(key).filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_string())
        };

        Ok(AppConfig {
            term: AcademicTerm::new(number("TIMETABLE_YEAR", 111)?, number("TIMETABLE_SEMESTER", 2)?),
            data_dir: PathBuf::from(text("TIMETABLE_DATA_DIR", "course_data")),
            db_path: PathBuf::from(text("TIMETABLE_DB_PATH", "data/timetable.db")),
            bind: text("TIMETABLE_BIND", "127.0.0.1:8080"),
        })
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(self.term.catalog_file_name())
    }
}
