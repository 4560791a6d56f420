//! Errores del generador de horarios.
//!
//! Todas las operaciones públicas devuelven `Result<T>` con `TimetableError`;
//! la capa HTTP traduce cada variante a un código de estado.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimetableError {
    /// No se pudo leer el archivo del catálogo.
    #[error("no se pudo leer el catálogo '{path}': {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// El catálogo existe pero su JSON no es válido.
    #[error("catálogo con formato inválido: {0}")]
    CatalogFormat(#[from] serde_json::Error),

    #[error("curso desconocido: {0}")]
    UnknownCourse(String),

    #[error("el curso {0} ya está seleccionado")]
    AlreadySelected(String),

    #[error("el curso {0} no está seleccionado")]
    NotSelected(String),

    /// Choque de horario: `slots` son los bloques compartidos y `holders`
    /// los cursos que ya los ocupan (mismo orden).
    #[error("衝堂了啦！ {course_id} choca en {}", .slots.join(","))]
    Conflict {
        course_id: String,
        slots: Vec<String>,
        holders: Vec<String>,
    },

    /// Parámetro de búsqueda inválido (p.ej. una letra de día desconocida).
    #[error("filtro inválido: {0}")]
    InvalidFilter(String),

    #[error("error de almacenamiento: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("almacén no disponible: {0}")]
    StoreUnavailable(String),

    #[error("no se pudo serializar la selección: {0}")]
    Snapshot(#[source] serde_json::Error),

    #[error("configuración inválida: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TimetableError>;
