// Biblioteca raíz del crate `classshift`.
// El motor (`algorithm`) no sabe nada de HTTP ni de SQLite: recibe un
// `CourseCatalog`, un generador aleatorio y un observador.
pub mod algorithm;
pub mod api_json;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod server_handlers;
pub mod storage;

pub use algorithm::{GenerationOutcome, SearchOptions, Warning, generate_schedules};
pub use catalog::{CourseCatalog, InMemoryCatalog, SqliteCatalog};
pub use config::AppConfig;
pub use error::{Result, ScheduleError};

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
