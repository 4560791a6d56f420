//! Resumen del catálogo: créditos, tipos, idioma, bloques por día y cupos.

use serde::Serialize;

use super::compare_course_ids;
use crate::models::{day_index, CourseRecord, NOT_APPLICABLE_REG_NUM, UNLIMITED_NUM_LIMIT};

/// Cuántos cursos hay en el ranking de inscritos.
const MOST_ENROLLED: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditCount {
    pub credit: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    /// Créditos ascendentes.
    pub credits: Vec<CreditCount>,
    /// Tipos de curso, el más frecuente primero.
    pub types: Vec<CountEntry>,
    pub english_taught: usize,
    /// Bloques ocupados por día, el más cargado primero; empate en orden de semana.
    pub slots_per_day: Vec<CountEntry>,
    /// Ids con cupo real y tantos inscritos como cupos.
    pub full: Vec<String>,
    pub most_enrolled: Vec<String>,
}

impl CatalogStats {
    pub fn of<'a, I>(courses: I) -> Self
    where
        I: IntoIterator<Item = &'a CourseRecord>,
    {
        let mut courses: Vec<&CourseRecord> = courses.into_iter().collect();
        courses.sort_by(|a, b| compare_course_ids(&a.id, &b.id));

        let mut credit_values: Vec<f64> = courses.iter().map(|c| c.credit).collect();
        credit_values.sort_by(f64::total_cmp);
        let mut credits: Vec<CreditCount> = Vec::new();
        for credit in credit_values {
            match credits.last_mut() {
                Some(last) if last.credit == credit => last.count += 1,
                _ => credits.push(CreditCount { credit, count: 1 }),
            }
        }

        let mut types: Vec<CountEntry> = Vec::new();
        for c in &courses {
            match types.iter_mut().find(|e| e.label == c.course_type) {
                Some(e) => e.count += 1,
                None => types.push(CountEntry { label: c.course_type.clone(), count: 1 }),
            }
        }
        types.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

        let mut slots_per_day: Vec<CountEntry> = Vec::new();
        for slot in courses.iter().flat_map(|c| c.time.iter()) {
            let label = slot.day().to_string();
            match slots_per_day.iter_mut().find(|e| e.label == label) {
                Some(e) => e.count += 1,
                None => slots_per_day.push(CountEntry { label, count: 1 }),
            }
        }
        let week_pos = |label: &str| label.chars().next().and_then(day_index);
        slots_per_day.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| week_pos(&a.label).cmp(&week_pos(&b.label))));

        let full = courses
            .iter()
            .filter(|c| {
                c.num_limit > 0
                    && c.num_limit != UNLIMITED_NUM_LIMIT
                    && c.reg_num != NOT_APPLICABLE_REG_NUM
                    && c.reg_num >= c.num_limit
            })
            .map(|c| c.id.clone())
            .collect();

        let mut enrolled: Vec<&&CourseRecord> = courses.iter().filter(|c| c.reg_num != NOT_APPLICABLE_REG_NUM).collect();
        enrolled.sort_by(|a, b| b.reg_num.cmp(&a.reg_num).then_with(|| compare_course_ids(&a.id, &b.id)));
        let most_enrolled = enrolled.into_iter().take(MOST_ENROLLED).map(|c| c.id.clone()).collect();

        CatalogStats {
            total: courses.len(),
            credits,
            types,
            english_taught: courses.iter().filter(|c| c.english).count(),
            slots_per_day,
            full,
            most_enrolled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> CourseRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn unlimited_or_unknown_enrolment_is_never_full() {
        let courses = vec![
            record(r#"{"id":"1","num_limit":9999,"reg_num":10000}"#),
            record(r#"{"id":"2","num_limit":30}"#),
            record(r#"{"id":"3","num_limit":0,"reg_num":5}"#),
            record(r#"{"id":"4","num_limit":30,"reg_num":31}"#),
        ];
        let stats = CatalogStats::of(&courses);
        assert_eq!(stats.full, vec!["4"]);
        assert_eq!(stats.most_enrolled, vec!["1", "4", "3"]);
    }

    #[test]
    fn empty_catalog() {
        let stats = CatalogStats::of(&Vec::<CourseRecord>::new());
        assert_eq!(stats.total, 0);
        assert!(stats.credits.is_empty());
        assert!(stats.slots_per_day.is_empty());
    }
}
