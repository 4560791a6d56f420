//! Persistencia de la selección.
//!
//! Se guarda como entradas clave-valor (`selected_course`, `year`, `semester`,
//! `saved_at`). Al leer, una instantánea de otro período o ilegible equivale a
//! una selección vacía.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, warn};

use crate::error::{Result, TimetableError};
use crate::models::{AcademicTerm, SelectionSet};

pub const KEY_SELECTED: &str = "selected_course";
pub const KEY_YEAR: &str = "year";
pub const KEY_SEMESTER: &str = "semester";
pub const KEY_SAVED_AT: &str = "saved_at";

/// Lo que se escribe tras cada transición.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub term: AcademicTerm,
    pub selected: BTreeMap<String, bool>,
    pub saved_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(term: AcademicTerm, selection: &SelectionSet) -> Self {
        Snapshot { term, selected: selection.to_flags(), saved_at: Utc::now() }
    }

    /// Pares clave-valor tal como se almacenan.
    pub fn entries(&self) -> Result<Vec<(&'static str, String)>> {
        let selected = serde_json::to_string(&self.selected).map_err(TimetableError::Snapshot)?;
        Ok(vec![
            (KEY_SELECTED, selected),
            (KEY_YEAR, self.term.year.to_string()),
            (KEY_SEMESTER, self.term.semester.to_string()),
            (KEY_SAVED_AT, self.saved_at.to_rfc3339()),
        ])
    }
}

/// Valores crudos leídos del almacén; cualquiera puede faltar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredSnapshot {
    pub selected_course: Option<String>,
    pub year: Option<String>,
    pub semester: Option<String>,
}

impl StoredSnapshot {
    /// Selección guardada para `term`. Otro período, JSON corrupto o `null`
    /// devuelven una selección vacía.
    pub fn selection_for(&self, term: AcademicTerm) -> SelectionSet {
        let same_term = self.year.as_deref().map(str::trim) == Some(term.year.to_string().as_str())
            && self.semester.as_deref().map(str::trim) == Some(term.semester.to_string().as_str());
        if !same_term {
            debug!(
                "selección guardada de otro período ({:?}-{:?}), se descarta",
                self.year, self.semester
            );
            return SelectionSet::new();
        }
        let Some(raw) = self.selected_course.as_deref() else {
            return SelectionSet::new();
        };
        match serde_json::from_str::<Option<BTreeMap<String, bool>>>(raw) {
            Ok(Some(flags)) => SelectionSet::from_flags(flags),
            Ok(None) => SelectionSet::new(),
            Err(e) => {
                warn!("selección guardada ilegible, se ignora: {}", e);
                SelectionSet::new()
            }
        }
    }
}

pub trait SnapshotStore {
    fn load(&self) -> Result<StoredSnapshot>;

    /// Escribe todas las entradas o ninguna.
    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn load(&self) -> Result<StoredSnapshot> {
        (**self).load()
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        (**self).save(snapshot)
    }
}

/// Almacén SQLite con una tabla `kv(key, value)`.
pub struct SqliteStore {
    conn: Connection,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteStore(..)")
    }
}

impl SqliteStore {
    /// Abre (o crea) la base en `path`, creando el directorio si hace falta.
    /// Un archivo que no es una base SQLite se reemplaza por una base vacía.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| TimetableError::StoreUnavailable(format!(
                    "no se pudo crear {}: {}",
                    dir.display(),
                    e
                )))?;
            }
        }
        match Self::init(Connection::open(path)?) {
            Err(TimetableError::Storage(e)) if is_not_a_database(&e) => {
                warn!("{} no es una base SQLite válida ({}), se recrea vacía", path.display(), e);
                fs::remove_file(path).map_err(|e| TimetableError::StoreUnavailable(format!(
                    "no se pudo reemplazar {}: {}",
                    path.display(),
                    e
                )))?;
                Self::init(Connection::open(path)?)
            }
            other => other,
        }
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(SqliteStore { conn })
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

fn is_not_a_database(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(f, _) if f.code == ErrorCode::NotADatabase)
}

impl SnapshotStore for SqliteStore {
    fn load(&self) -> Result<StoredSnapshot> {
        Ok(StoredSnapshot {
            selected_course: self.get(KEY_SELECTED)?,
            year: self.get(KEY_YEAR)?,
            semester: self.get(KEY_SEMESTER)?,
        })
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        let entries = snapshot.entries()?;
        let tx = self.conn.transaction()?;
        for (key, value) in entries.iter() {
            tx.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

/// Almacén en memoria. `fail_writes` simula un disco que rechaza escrituras.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MemoryStore {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            fail_writes: false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<StoredSnapshot> {
        Ok(StoredSnapshot {
            selected_course: self.entries.get(KEY_SELECTED).cloned(),
            year: self.entries.get(KEY_YEAR).cloned(),
            semester: self.entries.get(KEY_SEMESTER).cloned(),
        })
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        if self.fail_writes {
            return Err(TimetableError::StoreUnavailable("escrituras deshabilitadas".to_string()));
        }
        for (key, value) in snapshot.entries()? {
            self.entries.insert(key.to_string(), value);
        }
        Ok(())
    }
}
