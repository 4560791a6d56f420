use actix_web::{HttpResponse, Responder};
use serde_json::json;

/// GET /help
pub async fn help_handler() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "description": "API del armador de horarios. Buscar cursos, agregarlos/quitarlos de la grilla semanal y consultar totales.",
        "endpoints": {
            "GET /courses?q=&day=&credit=": "busca por id exacto, profesor o nombre (sin distinguir mayúsculas), opcionalmente por día (M..U) y créditos",
            "GET /courses/{id}": "ficha del curso",
            "GET /selection": "cursos elegidos y totales",
            "POST /selection/{id}": "agrega un curso (409 si hay choque de horario)",
            "DELETE /selection/{id}": "quita un curso",
            "POST /selection/{id}/toggle": "agrega o quita según el estado actual",
            "GET /preview/{id}": "bloques del curso libres u ocupados",
            "GET /timetable": "grilla semanal y nombre del archivo de exportación",
            "GET /conflicts?ids=": "choques entre cada par de los cursos indicados",
            "GET /stats": "resumen del catálogo: créditos, tipos, idioma, bloques por día y cupos"
        },
        "example": "/courses?q=微積分"
    }))
}
