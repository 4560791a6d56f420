use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use super::{error_response, lock_state};
use crate::api_json::{course_detail, course_summary, CourseSummary, SearchParams};
use crate::error::TimetableError;
use crate::server::AppState;

/// GET /courses?q=...&day=...&credit=...
/// Resultados ordenados por id; `selected` indica si ya está en la grilla.
pub async fn search_handler(state: web::Data<AppState>, query: web::Query<SearchParams>) -> impl Responder {
    let filter = match query.filter() {
        Ok(f) => f,
        Err(e) => return error_response(&e),
    };
    let tt = match lock_state(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    let found = match tt.index().search(&filter) {
        Ok(found) => found,
        Err(e) => return error_response(&e),
    };
    let results: Vec<CourseSummary> = found
        .into_iter()
        .map(|c| course_summary(c, tt.is_selected(&c.id)))
        .collect();
    HttpResponse::Ok().json(json!({
        "query": query.q,
        "count": results.len(),
        "courses": results
    }))
}

/// GET /courses/{id}
pub async fn course_detail_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let tt = match lock_state(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match tt.index().get(&id) {
        Some(course) => HttpResponse::Ok().json(course_detail(course, tt.term())),
        None => error_response(&TimetableError::UnknownCourse(id)),
    }
}
