pub mod courses;
pub mod docs;
pub mod reports;
pub mod selection;
pub mod timetable;

pub use courses::*;
pub use docs::*;
pub use reports::*;
pub use selection::*;
pub use timetable::*;

use actix_web::HttpResponse;
use serde_json::json;
use std::sync::MutexGuard;

use crate::error::TimetableError;
use crate::server::{AppState, SharedTimetable};

/// Traduce un error del dominio a la respuesta HTTP correspondiente.
pub fn error_response(e: &TimetableError) -> HttpResponse {
    match e {
        TimetableError::UnknownCourse(_) | TimetableError::NotSelected(_) => {
            HttpResponse::NotFound().json(json!({"error": e.to_string()}))
        }
        TimetableError::InvalidFilter(_) => HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
        TimetableError::AlreadySelected(_) => HttpResponse::Conflict().json(json!({"error": e.to_string()})),
        TimetableError::Conflict { course_id, slots, holders } => HttpResponse::Conflict().json(json!({
            "error": e.to_string(),
            "course_id": course_id,
            "slots": slots,
            "holders": holders
        })),
        _ => HttpResponse::InternalServerError().json(json!({"error": e.to_string()})),
    }
}

/// Toma el candado del estado; un mutex envenenado se responde con 500.
pub(crate) fn lock_state(state: &AppState) -> Result<MutexGuard<'_, SharedTimetable>, HttpResponse> {
    state
        .timetable
        .lock()
        .map_err(|_| HttpResponse::InternalServerError().json(json!({"error": "timetable state poisoned"})))
}
