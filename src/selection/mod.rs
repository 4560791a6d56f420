//! Estado de la aplicación: cursos elegidos, bloques ocupados y totales.
//!
//! `Timetable` es el único dueño de ese estado. Cada transición (`select`,
//! `deselect`) valida, persiste la instantánea y recién entonces modifica la
//! memoria, así que un error deja todo exactamente como estaba.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::algorithm::{Clash, OccupancyMap};
use crate::catalog::ScheduleIndex;
use crate::error::{Result, TimetableError};
use crate::grid::TimetableGrid;
use crate::models::{AcademicTerm, CourseRecord, SelectionSet, SlotToken};
use crate::storage::{Snapshot, SnapshotStore, StoredSnapshot};

/// Créditos y horas de la selección.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub credits: f64,
    pub hours: f64,
}

impl Totals {
    /// Suma en orden de id, de modo que la misma selección da siempre los
    /// mismos valores.
    fn of(index: &ScheduleIndex, selection: &SelectionSet) -> Self {
        selection
            .iter()
            .filter_map(|id| index.get(id))
            .fold(Totals::default(), |acc, c| Totals {
                credits: acc.credits + c.credit,
                hours: acc.hours + c.hours,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggled {
    Selected,
    Deselected,
}

/// Estado de un bloque al pasar el cursor sobre un curso candidato.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotPreview {
    pub slot: SlotToken,
    /// Curso que ya ocupa el bloque; `None` si está libre.
    pub holder: Option<String>,
}

pub struct Timetable<S: SnapshotStore> {
    index: Arc<ScheduleIndex>,
    term: AcademicTerm,
    selected: SelectionSet,
    occupancy: OccupancyMap,
    totals: Totals,
    store: S,
}

impl<S: SnapshotStore> Timetable<S> {
    /// Selección vacía; no lee el almacén.
    pub fn new(index: Arc<ScheduleIndex>, term: AcademicTerm, store: S) -> Self {
        Timetable {
            index,
            term,
            selected: SelectionSet::new(),
            occupancy: OccupancyMap::new(),
            totals: Totals::default(),
            store,
        }
    }

    /// Restaura la selección guardada. Se omiten (con aviso) los ids que no
    /// existen en el catálogo o que chocan con uno ya restaurado. Un almacén
    /// ilegible equivale a no tener nada guardado.
    pub fn open(index: Arc<ScheduleIndex>, term: AcademicTerm, store: S) -> Result<Self> {
        let stored = store.load().unwrap_or_else(|e| {
            warn!("no se pudo leer la selección guardada, se empieza vacía: {}", e);
            StoredSnapshot::default()
        });
        let wanted = stored.selection_for(term);
        let mut tt = Self::new(index, term, store);
        for id in wanted.iter() {
            let Some(record) = tt.index.get(id) else {
                warn!("curso guardado {} no existe en el catálogo {}, se omite", id, term);
                continue;
            };
            let clashes = tt.occupancy.clashes(&record.time);
            if !clashes.is_empty() {
                warn!("curso guardado {} choca con {}, se omite", id, clashes[0].holder);
                continue;
            }
            tt.occupancy.claim(id, &record.time);
            tt.selected.insert(id);
        }
        tt.totals = Totals::of(&tt.index, &tt.selected);
        info!("selección restaurada: {} cursos", tt.selected.len());
        Ok(tt)
    }

    pub fn term(&self) -> AcademicTerm {
        self.term
    }

    pub fn index(&self) -> &ScheduleIndex {
        &self.index
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selected
    }

    pub fn occupancy(&self) -> &OccupancyMap {
        &self.occupancy
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Cursos elegidos en orden de id.
    pub fn selected_records(&self) -> Vec<&CourseRecord> {
        let mut records: Vec<&CourseRecord> = self.selected.iter().filter_map(|id| self.index.get(id)).collect();
        records.sort_by(|a, b| crate::catalog::compare_course_ids(&a.id, &b.id));
        records
    }

    pub fn query(&self, term: &str) -> Vec<&CourseRecord> {
        self.index.query(term)
    }

    /// Agrega un curso. Falla con `Conflict` si comparte algún bloque con la
    /// selección actual.
    pub fn select(&mut self, id: &str) -> Result<Totals> {
        let index = Arc::clone(&self.index);
        let record = index.get(id).ok_or_else(|| TimetableError::UnknownCourse(id.to_string()))?;
        if self.selected.contains(id) {
            return Err(TimetableError::AlreadySelected(id.to_string()));
        }
        let clashes = self.occupancy.clashes(&record.time);
        if !clashes.is_empty() {
            debug!("choque al agregar {}: {:?}", id, clashes);
            return Err(conflict_error(id, clashes));
        }

        let mut next = self.selected.clone();
        next.insert(id);
        self.store.save(&Snapshot::new(self.term, &next))?;

        self.selected = next;
        self.occupancy.claim(id, &record.time);
        self.totals = Totals::of(&index, &self.selected);
        info!("curso {} agregado ({} créditos en total)", id, self.totals.credits);
        Ok(self.totals)
    }

    /// Quita un curso elegido y libera sus bloques.
    pub fn deselect(&mut self, id: &str) -> Result<Totals> {
        if !self.selected.contains(id) {
            return Err(TimetableError::NotSelected(id.to_string()));
        }
        let index = Arc::clone(&self.index);

        let mut next = self.selected.clone();
        next.remove(id);
        self.store.save(&Snapshot::new(self.term, &next))?;

        self.selected = next;
        if let Some(record) = index.get(id) {
            self.occupancy.release(id, &record.time);
        }
        self.totals = Totals::of(&index, &self.selected);
        info!("curso {} quitado ({} créditos en total)", id, self.totals.credits);
        Ok(self.totals)
    }

    /// Botón +/-: quita si ya está, agrega si no.
    pub fn toggle(&mut self, id: &str) -> Result<Toggled> {
        if self.selected.contains(id) {
            self.deselect(id).map(|_| Toggled::Deselected)
        } else {
            self.select(id).map(|_| Toggled::Selected)
        }
    }

    /// Para cada bloque del curso, quién lo ocupa (si alguien).
    pub fn preview(&self, id: &str) -> Result<Vec<SlotPreview>> {
        let record = self.index.get(id).ok_or_else(|| TimetableError::UnknownCourse(id.to_string()))?;
        Ok(record
            .time
            .iter()
            .map(|slot| SlotPreview {
                slot: *slot,
                holder: self.occupancy.owner(slot).map(str::to_string),
            })
            .collect())
    }

    pub fn grid(&self) -> TimetableGrid {
        TimetableGrid::build(self.term, self.selected_records())
    }
}

fn conflict_error(id: &str, clashes: Vec<Clash>) -> TimetableError {
    let (slots, holders): (Vec<String>, Vec<String>) = clashes.into_iter().map(|c| (c.slot.to_string(), c.holder)).unzip();
    TimetableError::Conflict { course_id: id.to_string(), slots, holders }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn course(id: &str, tc: &str, credit: f64) -> CourseRecord {
        let time = crate::algorithm::parse_slots(tc).into_keys().collect();
        CourseRecord {
            id: id.to_string(),
            name: format!("curso {}", id),
            teacher: String::new(),
            course_type: String::new(),
            memo: String::new(),
            credit,
            hours: credit,
            time,
            time_classroom: tc.to_string(),
            english: false,
            brief: vec![],
            num_limit: 9999,
            reg_num: -999,
        }
    }

    fn timetable() -> Timetable<MemoryStore> {
        let index = ScheduleIndex::from_records(vec![
            course("1", "M12-R1", 3.0),
            course("2", "M23-R2", 2.0),
            course("3", "T1-R3", 1.0),
        ]);
        Timetable::new(Arc::new(index), AcademicTerm::new(111, 2), MemoryStore::new())
    }

    #[test]
    fn toggle_twice_is_identity() {
        let mut tt = timetable();
        assert_eq!(tt.toggle("3").unwrap(), Toggled::Selected);
        assert_eq!(tt.toggle("3").unwrap(), Toggled::Deselected);
        assert!(tt.selection().is_empty());
        assert!(tt.occupancy().is_empty());
        assert_eq!(tt.totals(), Totals::default());
    }

    #[test]
    fn already_selected_is_rejected() {
        let mut tt = timetable();
        tt.select("1").unwrap();
        assert!(matches!(tt.select("1"), Err(TimetableError::AlreadySelected(_))));
    }

    #[test]
    fn preview_marks_taken_slots() {
        let mut tt = timetable();
        tt.select("1").unwrap();
        let p = tt.preview("2").unwrap();
        let taken: Vec<String> = p.iter().filter(|s| s.holder.is_some()).map(|s| s.slot.to_string()).collect();
        assert_eq!(taken, vec!["M2"]);
    }

    struct UnreadableStore;

    impl SnapshotStore for UnreadableStore {
        fn load(&self) -> Result<StoredSnapshot> {
            Err(TimetableError::StoreUnavailable("disco ilegible".to_string()))
        }

        fn save(&mut self, _snapshot: &Snapshot) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unreadable_store_opens_empty() {
        let index = Arc::new(ScheduleIndex::from_records(vec![course("1", "M12-R1", 3.0)]));
        let mut tt = Timetable::open(index, AcademicTerm::new(111, 2), UnreadableStore).unwrap();
        assert!(tt.selection().is_empty());
        assert_eq!(tt.select("1").unwrap().credits, 3.0);
    }
}
