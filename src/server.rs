use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::sync::Mutex;
use tracing::info;

use crate::api_json::handlers::{
    conflicts_handler, course_detail_handler, deselect_handler, help_handler, preview_handler, search_handler,
    select_handler, selection_handler, stats_handler, timetable_handler, toggle_handler,
};
use crate::selection::Timetable;
use crate::storage::SnapshotStore;

/// Controlador con el almacén detrás de un trait object, para poder usar
/// SQLite en producción y memoria en pruebas.
pub type SharedTimetable = Timetable<Box<dyn SnapshotStore + Send>>;

/// Estado compartido por los workers. El mutex serializa las transiciones:
/// nunca se intercalan dos `select`/`deselect`.
pub struct AppState {
    pub timetable: Mutex<SharedTimetable>,
}

impl AppState {
    pub fn new(timetable: SharedTimetable) -> Self {
        AppState { timetable: Mutex::new(timetable) }
    }
}

/// Registra todas las rutas; lo usan `run_server` y las pruebas.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/courses", web::get().to(search_handler))
        .route("/courses/{id}", web::get().to(course_detail_handler))
        .route("/selection", web::get().to(selection_handler))
        .route("/selection/{id}", web::post().to(select_handler))
        .route("/selection/{id}", web::delete().to(deselect_handler))
        .route("/selection/{id}/toggle", web::post().to(toggle_handler))
        .route("/preview/{id}", web::get().to(preview_handler))
        .route("/timetable", web::get().to(timetable_handler))
        .route("/conflicts", web::get().to(conflicts_handler))
        .route("/stats", web::get().to(stats_handler))
        .route("/help", web::get().to(help_handler));
}

pub async fn run_server(bind_addr: &str, state: AppState) -> std::io::Result<()> {
    let state = web::Data::new(state);
    info!("escuchando en http://{}", bind_addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
