// Funciones para detectar choques entre bloques ya ocupados y un curso candidato.
use crate::models::{CourseRecord, SlotToken};
use serde::Serialize;
use std::collections::BTreeMap;

/// Bloque -> curso que lo ocupa. Nunca hay dos dueños para el mismo bloque:
/// `Timetable::select` rechaza el curso antes de insertarlo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyMap {
    slots: BTreeMap<SlotToken, String>,
}

/// Un bloque compartido y el curso que ya lo tiene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clash {
    pub slot: SlotToken,
    pub holder: String,
}

impl OccupancyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self, slot: &SlotToken) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }

    pub fn contains(&self, slot: &SlotToken) -> bool {
        self.slots.contains_key(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotToken, &str)> {
        self.slots.iter().map(|(s, c)| (s, c.as_str()))
    }

    /// Bloques del candidato que ya están ocupados, sin repetir.
    pub fn clashes(&self, candidate: &[SlotToken]) -> Vec<Clash> {
        let mut out: Vec<Clash> = Vec::new();
        for slot in candidate {
            if let Some(holder) = self.slots.get(slot) {
                if !out.iter().any(|c| c.slot == *slot) {
                    out.push(Clash { slot: *slot, holder: holder.clone() });
                }
            }
        }
        out
    }

    pub(crate) fn claim(&mut self, course_id: &str, slots: &[SlotToken]) {
        for slot in slots {
            self.slots.insert(*slot, course_id.to_string());
        }
    }

    /// Libera sólo los bloques cuyo dueño es `course_id`.
    pub(crate) fn release(&mut self, course_id: &str, slots: &[SlotToken]) {
        for slot in slots {
            if self.slots.get(slot).is_some_and(|owner| owner == course_id) {
                self.slots.remove(slot);
            }
        }
    }
}

/// True si algún bloque del candidato ya está en el mapa de ocupación.
pub fn is_conflict(candidate: &[SlotToken], occupancy: &OccupancyMap) -> bool {
    candidate.iter().any(|slot| occupancy.contains(slot))
}

/// Dos cursos que comparten bloques.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairClash {
    pub first: String,
    pub second: String,
    pub slots: Vec<SlotToken>,
}

/// Revisa cada par (en el orden dado) y devuelve los que chocan, con los
/// bloques compartidos ordenados.
pub fn pair_clashes(courses: &[&CourseRecord]) -> Vec<PairClash> {
    let mut out = Vec::new();
    for (i, first) in courses.iter().enumerate() {
        let mut occupancy = OccupancyMap::new();
        occupancy.claim(&first.id, &first.time);
        for second in &courses[i + 1..] {
            let mut slots: Vec<SlotToken> = occupancy.clashes(&second.time).into_iter().map(|c| c.slot).collect();
            if slots.is_empty() {
                continue;
            }
            slots.sort();
            out.push(PairClash { first: first.id.clone(), second: second.id.clone(), slots });
        }
    }
    out
}
