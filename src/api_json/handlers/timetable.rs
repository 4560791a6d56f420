use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use super::{error_response, lock_state};
use crate::server::AppState;

/// GET /timetable
/// Grilla completa (períodos x días) y el nombre sugerido para exportarla.
pub async fn timetable_handler(state: web::Data<AppState>) -> impl Responder {
    let tt = match lock_state(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    HttpResponse::Ok().json(tt.grid())
}

/// GET /preview/{id}
/// Bloques del curso marcados como libres u ocupados (vista al pasar el cursor).
pub async fn preview_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let tt = match lock_state(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match tt.preview(&id) {
        Ok(slots) => {
            let conflict = slots.iter().any(|s| s.holder.is_some());
            HttpResponse::Ok().json(json!({"id": id, "conflict": conflict, "slots": slots}))
        }
        Err(e) => error_response(&e),
    }
}
