//! Catálogo de cursos de un período académico.
//!
//! Se carga una sola vez desde `<data_dir>/<año>-<semestre>_data.json`, cuyo
//! valor raíz es un objeto `id -> curso`. Si la lectura o el parseo fallan no
//! se construye ningún índice: nunca se sirve un catálogo parcial.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use crate::algorithm::{pair_clashes, PairClash};
use crate::error::{Result, TimetableError};
use crate::models::{day_index, AcademicTerm, CourseRecord};

pub mod stats;

pub use stats::{CatalogStats, CountEntry, CreditCount};

/// Criterios de `ScheduleIndex::search`. Los que vienen se combinan con "y".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseFilter {
    pub text: String,
    /// Letra del día (`M` .. `U`).
    pub day: Option<char>,
    pub credit: Option<f64>,
}

impl CourseFilter {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.day.is_none() && self.credit.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    courses: BTreeMap<String, CourseRecord>,
}

impl ScheduleIndex {
    /// Si dos cursos comparten id se queda el último, con un aviso.
    pub fn from_records<I: IntoIterator<Item = CourseRecord>>(records: I) -> Self {
        let (courses, duplicates) = collect_unique(records);
        for id in duplicates {
            warn!("id de curso repetido {}: se conserva la última versión", id);
        }
        ScheduleIndex { courses }
    }

    /// Construye el índice desde el JSON del catálogo. Un curso sin `id` toma
    /// la clave del objeto.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, CourseRecord> = serde_json::from_str(json)?;
        let records = raw.into_iter().map(|(key, mut record)| {
            if record.id.is_empty() {
                record.id = key;
            }
            record
        });
        let index = Self::from_records(records);
        index.warn_inconsistent();
        Ok(index)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TimetableError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        let index = Self::from_json_str(&text)?;
        info!("catálogo cargado desde {}: {} cursos", path.display(), index.len());
        Ok(index)
    }

    /// Carga el catálogo del período dentro de `data_dir`.
    pub fn load_term<P: AsRef<Path>>(data_dir: P, term: AcademicTerm) -> Result<Self> {
        Self::load(data_dir.as_ref().join(term.catalog_file_name()))
    }

    pub fn get(&self, id: &str) -> Option<&CourseRecord> {
        self.courses.get(id)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &CourseRecord> {
        self.courses.values()
    }

    /// Busca por id exacto o por texto contenido en el profesor o el nombre,
    /// sin distinguir mayúsculas. El término se compara como texto literal.
    /// Un término en blanco no coincide con nada.
    /// Resultado ordenado por id (numérico cuando ambos ids lo son).
    pub fn query(&self, term: &str) -> Vec<&CourseRecord> {
        if term.trim().is_empty() {
            return Vec::new();
        }
        let needle = term.to_lowercase();
        let mut found: Vec<&CourseRecord> = self
            .courses
            .values()
            .filter(|c| {
                c.id.to_lowercase() == needle
                    || c.teacher.to_lowercase().contains(&needle)
                    || c.name.to_lowercase().contains(&needle)
            })
            .collect();
        found.sort_by(|a, b| compare_course_ids(&a.id, &b.id));
        found
    }

    /// Cursos con al menos un bloque en `day`.
    pub fn by_day(&self, day: char) -> Vec<&CourseRecord> {
        self.sorted(|c| c.time.iter().any(|s| s.day() == day))
    }

    pub fn by_credit(&self, credit: f64) -> Vec<&CourseRecord> {
        self.sorted(|c| c.credit == credit)
    }

    /// Combina texto, día y créditos. Sin ningún criterio no devuelve nada,
    /// igual que `query` con un término en blanco.
    pub fn search(&self, filter: &CourseFilter) -> Result<Vec<&CourseRecord>> {
        if let Some(day) = filter.day {
            if day_index(day).is_none() {
                return Err(TimetableError::InvalidFilter(format!("día desconocido '{}'", day)));
            }
        }
        if filter.is_empty() {
            return Ok(Vec::new());
        }
        let base = if filter.text.trim().is_empty() {
            self.sorted(|_| true)
        } else {
            self.query(&filter.text)
        };
        Ok(base
            .into_iter()
            .filter(|c| filter.day.is_none_or(|d| c.time.iter().any(|s| s.day() == d)))
            .filter(|c| filter.credit.is_none_or(|cr| c.credit == cr))
            .collect())
    }

    /// Choques entre cada par de los cursos pedidos.
    pub fn clash_report(&self, ids: &[&str]) -> Result<Vec<PairClash>> {
        let records = ids
            .iter()
            .map(|id| self.get(id).ok_or_else(|| TimetableError::UnknownCourse(id.to_string())))
            .collect::<Result<Vec<_>>>()?;
        Ok(pair_clashes(&records))
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::of(self.records())
    }

    fn sorted<F: Fn(&CourseRecord) -> bool>(&self, keep: F) -> Vec<&CourseRecord> {
        let mut found: Vec<&CourseRecord> = self.courses.values().filter(|c| keep(c)).collect();
        found.sort_by(|a, b| compare_course_ids(&a.id, &b.id));
        found
    }

    /// Ids de cursos cuyo `time` no coincide con lo que se deriva de `time-classroom`.
    pub fn inconsistent_records(&self) -> Vec<&str> {
        self.courses
            .values()
            .filter(|c| !c.slots_consistent())
            .map(|c| c.id.as_str())
            .collect()
    }

    fn warn_inconsistent(&self) {
        for id in self.inconsistent_records() {
            warn!("curso {}: 'time' y 'time-classroom' no describen los mismos bloques", id);
        }
    }
}

fn collect_unique<I: IntoIterator<Item = CourseRecord>>(records: I) -> (BTreeMap<String, CourseRecord>, Vec<String>) {
    let mut courses = BTreeMap::new();
    let mut duplicates = Vec::new();
    for record in records {
        let id = record.id.clone();
        if courses.insert(id.clone(), record).is_some() {
            duplicates.push(id);
        }
    }
    (courses, duplicates)
}

/// Orden de ids: numérico si ambos son enteros, si no lexicográfico
/// (los numéricos van primero).
pub fn compare_course_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
