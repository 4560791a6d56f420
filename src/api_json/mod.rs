pub mod handlers;

use serde::{Deserialize, Serialize};

use crate::catalog::CourseFilter;
use crate::error::{Result, TimetableError};
use crate::models::{AcademicTerm, CourseRecord};
use crate::selection::Totals;

/// Parámetros de `GET /courses`.
///
/// # Ejemplo
/// `/courses?q=微積分` busca por nombre, profesor o id exacto.
/// `/courses?day=M&credit=3` lista los cursos de 3 créditos con clase el lunes.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub day: Option<String>,
    pub credit: Option<f64>,
}

impl SearchParams {
    /// `day` debe ser una sola letra; se acepta en minúscula.
    pub fn filter(&self) -> Result<CourseFilter> {
        let day = match self.day.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            None => None,
            Some(d) => {
                let mut chars = d.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c.to_ascii_uppercase()),
                    _ => return Err(TimetableError::InvalidFilter(format!("día desconocido '{}'", d))),
                }
            }
        };
        Ok(CourseFilter { text: self.q.clone(), day, credit: self.credit })
    }
}

/// Parámetros de `GET /conflicts`: ids separados por coma.
#[derive(Debug, Deserialize)]
pub struct ConflictParams {
    #[serde(default)]
    pub ids: String,
}

impl ConflictParams {
    pub fn id_list(&self) -> Vec<&str> {
        self.ids.split(',').map(str::trim).filter(|id| !id.is_empty()).collect()
    }
}

/// Fila de la lista de resultados / de la lista de elegidos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseSummary {
    pub id: String,
    pub name: String,
    pub teacher: String,
    pub credit: f64,
    pub badges: Vec<String>,
    pub selected: bool,
}

/// Ficha completa del curso (lo que muestra el modal).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseDetail {
    pub id: String,
    pub name: String,
    pub teacher: String,
    pub credit: f64,
    pub hours: f64,
    pub time_classroom: String,
    pub num_limit: String,
    pub reg_num: String,
    pub badges: Vec<String>,
    pub memo: String,
    pub outline_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionView {
    pub term: String,
    pub courses: Vec<CourseSummary>,
    pub total_credits: f64,
    pub total_hours: f64,
}

pub fn course_summary(course: &CourseRecord, selected: bool) -> CourseSummary {
    CourseSummary {
        id: course.id.clone(),
        name: course.name.clone(),
        teacher: course.teacher.clone(),
        credit: course.credit,
        badges: course.badges(),
        selected,
    }
}

pub fn course_detail(course: &CourseRecord, term: AcademicTerm) -> CourseDetail {
    CourseDetail {
        id: course.id.clone(),
        name: course.name.clone(),
        teacher: course.teacher.clone(),
        credit: course.credit,
        hours: course.hours,
        time_classroom: course.time_classroom.clone(),
        num_limit: course.num_limit_label(),
        reg_num: course.reg_num_label(),
        badges: course.badges(),
        memo: course.memo.clone(),
        outline_url: term.outline_url(&course.id),
    }
}

pub fn selection_view<'a, I>(term: AcademicTerm, courses: I, totals: Totals) -> SelectionView
where
    I: IntoIterator<Item = &'a CourseRecord>,
{
    SelectionView {
        term: term.to_string(),
        courses: courses.into_iter().map(|c| course_summary(c, true)).collect(),
        total_credits: totals.credits,
        total_hours: totals.hours,
    }
}
