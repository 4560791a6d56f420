use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use super::{error_response, lock_state};
use crate::api_json::ConflictParams;
use crate::server::AppState;

/// GET /conflicts?ids=1101,1103,998
/// Todos los pares de la lista que comparten bloques, sin tocar la selección.
pub async fn conflicts_handler(state: web::Data<AppState>, query: web::Query<ConflictParams>) -> impl Responder {
    let tt = match lock_state(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match tt.index().clash_report(&query.id_list()) {
        Ok(report) => HttpResponse::Ok().json(json!({
            "count": report.len(),
            "conflicts": report
        })),
        Err(e) => error_response(&e),
    }
}

/// GET /stats
pub async fn stats_handler(state: web::Data<AppState>) -> impl Responder {
    let tt = match lock_state(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    HttpResponse::Ok().json(tt.index().stats())
}
