use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::warn;

use super::{error_response, lock_state};
use crate::api_json::selection_view;
use crate::server::AppState;

/// GET /selection
/// Cursos elegidos y totales de créditos/horas.
pub async fn selection_handler(state: web::Data<AppState>) -> impl Responder {
    let tt = match lock_state(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    HttpResponse::Ok().json(selection_view(tt.term(), tt.selected_records(), tt.totals()))
}

/// POST /selection/{id}
/// 409 si choca con la selección actual; en ese caso nada cambia.
pub async fn select_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let mut tt = match lock_state(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match tt.select(&id) {
        Ok(totals) => HttpResponse::Ok().json(json!({"status": "ok", "selected": id, "totals": totals})),
        Err(e) => {
            warn!("no se pudo agregar {}: {}", id, e);
            error_response(&e)
        }
    }
}

/// DELETE /selection/{id}
pub async fn deselect_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let mut tt = match lock_state(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match tt.deselect(&id) {
        Ok(totals) => HttpResponse::Ok().json(json!({"status": "ok", "deselected": id, "totals": totals})),
        Err(e) => error_response(&e),
    }
}

/// POST /selection/{id}/toggle
pub async fn toggle_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let mut tt = match lock_state(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match tt.toggle(&id) {
        Ok(result) => HttpResponse::Ok().json(json!({"status": "ok", "id": id, "result": result, "totals": tt.totals()})),
        Err(e) => {
            warn!("no se pudo cambiar {}: {}", id, e);
            error_response(&e)
        }
    }
}
