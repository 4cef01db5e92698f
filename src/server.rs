use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http, web};
use tokio::sync::Semaphore;

use crate::catalog::SqliteCatalog;
use crate::config::AppConfig;
use crate::error::Result;
use crate::server_handlers::*;
use crate::storage::ScheduleStore;

/// Estado compartido por todos los workers.
pub struct AppState {
    pub config: AppConfig,
    pub catalog: SqliteCatalog,
    pub store: ScheduleStore,
    /// Limita las generaciones simultáneas al número de CPUs.
    pub gate: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let catalog = SqliteCatalog::open(&config.db_path)?;
        let store = ScheduleStore::open(&config.db_path)?;
        let gate = Arc::new(Semaphore::new(std::cmp::max(1, num_cpus::get())));
        Ok(Self { config, catalog, store, gate })
    }
}

/// Registra las rutas; se usa tanto en `run_server` como en los tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/ping", web::get().to(ping_handler))
        .route("/help", web::get().to(help_handler))
        .route("/schedules/generate", web::post().to(generate_handler))
        .route("/catalog/{term_id}", web::get().to(catalog_list_handler))
        .route("/catalog/{term_id}/courses/{course_id}", web::get().to(catalog_course_handler))
        .route("/catalog/{term_id}/{department}", web::put().to(catalog_upsert_handler))
        .route("/saved-schedules", web::post().to(save_schedule_handler))
        .route("/saved-schedules", web::get().to(list_saved_handler))
        .route("/saved-schedules/{id}", web::delete().to(delete_saved_handler));
}

fn cors_for(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::ACCEPT])
        .max_age(3600)
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let bind_addr = config.bind_addr.clone();
    let state = match AppState::new(config) {
        Ok(s) => web::Data::new(s),
        Err(e) => return Err(std::io::Error::other(e.to_string())),
    };

    tracing::info!(
        event = "server_start",
        bind = %bind_addr,
        db = %state.config.db_path.display(),
        workers_gate = state.gate.available_permits()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors_for(&state.config.cors_origin))
            .configure(configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
