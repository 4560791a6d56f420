// Grilla semanal: una fila por período, una columna por día.
use serde::Serialize;

use crate::models::{AcademicTerm, CourseRecord, SlotToken, DAYS, PERIODS};

/// Celda ocupada: curso y sala para ese bloque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub course_id: String,
    pub name: String,
    /// Vacía si `time-classroom` no menciona el bloque.
    pub classroom: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridRow {
    pub period: char,
    pub time_range: &'static str,
    /// Siete celdas, en el orden de `DAYS`.
    pub cells: Vec<Option<GridCell>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimetableGrid {
    pub term: AcademicTerm,
    pub days: Vec<char>,
    pub rows: Vec<GridRow>,
    pub export_file_name: String,
}

impl TimetableGrid {
    pub fn build<'a, I>(term: AcademicTerm, courses: I) -> Self
    where
        I: IntoIterator<Item = &'a CourseRecord>,
    {
        let mut rows: Vec<GridRow> = PERIODS
            .iter()
            .map(|(period, time_range)| GridRow {
                period: *period,
                time_range: *time_range,
                cells: vec![None; DAYS.len()],
            })
            .collect();

        for course in courses {
            let classrooms = course.classrooms();
            for slot in &course.time {
                let (row, col) = slot.grid_position();
                rows[row].cells[col] = Some(GridCell {
                    course_id: course.id.clone(),
                    name: course.name.clone(),
                    classroom: classrooms.get(slot).cloned().unwrap_or_default(),
                });
            }
        }

        TimetableGrid {
            term,
            days: DAYS.to_vec(),
            rows,
            export_file_name: term.export_file_name(),
        }
    }

    pub fn cell(&self, slot: &SlotToken) -> Option<&GridCell> {
        let (row, col) = slot.grid_position();
        self.rows.get(row).and_then(|r| r.cells.get(col)).and_then(Option::as_ref)
    }

    pub fn occupied_cells(&self) -> usize {
        self.rows.iter().map(|r| r.cells.iter().filter(|c| c.is_some()).count()).sum()
    }
}
