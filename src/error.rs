// Tipos de error compartidos por el motor, el catálogo y el servidor.
use thiserror::Error;

/// Resultado estándar del crate.
pub type Result<T> = std::result::Result<T, ScheduleError>;

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Entrada inválida: lista de cursos vacía, día/hora mal formados,
    /// categoría desconocida, tope inválido, etc.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Ninguno de los cursos pedidos existe en el catálogo del término.
    #[error("none of the requested courses could be resolved for term {term_id}: {}", requested.join(", "))]
    NoResolvableCourses { term_id: i64, requested: Vec<String> },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ScheduleError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ScheduleError::InvalidInput(msg.into())
    }

    /// Etiqueta estable usada en los cuerpos de error HTTP.
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::InvalidInput(_) => "invalid_input",
            ScheduleError::NoResolvableCourses { .. } => "no_resolvable_courses",
            ScheduleError::Storage(_) => "storage",
            ScheduleError::Payload(_) => "payload",
            ScheduleError::Io(_) => "io",
            ScheduleError::Config(_) => "config",
        }
    }
}
