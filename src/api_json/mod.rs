use serde::{Deserialize, Serialize};

use crate::algorithm::{GenerationOutcome, SearchOptions, Warning};
use crate::config::MAX_SCHEDULES_LIMIT;
use crate::error::{Result, ScheduleError};
use crate::models::Schedule;

/// Petición de generación de horarios.
///
/// # Estructura del JSON esperado:
/// ```json
/// {
///   "term_id": 20253,
///   "courses": ["CSCI-104", "MATH-225"],
///   "max_schedules": 5,
///   "seed": 42
/// }
/// ```
///
/// # Campos:
/// - `term_id`: término académico (p. ej. 20253 = otoño 2025)
/// - `courses`: ids publicados de los cursos (requerido, no vacío)
/// - `max_schedules`: tope de horarios a devolver (opcional, 1..=100)
/// - `seed`: semilla para obtener resultados reproducibles (opcional)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub term_id: i64,
    pub courses: Vec<String>,
    #[serde(default)]
    pub max_schedules: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
}

pub fn parse_json_input(json_str: &str) -> std::result::Result<GenerateRequest, serde_json::Error> {
    serde_json::from_str::<GenerateRequest>(json_str)
}

impl GenerateRequest {
    /// Opciones de búsqueda; usa `default_max` si la petición no trae tope.
    pub fn search_options(&self, default_max: usize) -> Result<SearchOptions> {
        let max = self.max_schedules.unwrap_or(default_max);
        if max > MAX_SCHEDULES_LIMIT {
            return Err(ScheduleError::invalid(format!(
                "max_schedules must be at most {}",
                MAX_SCHEDULES_LIMIT
            )));
        }
        SearchOptions::with_max_schedules(max)
    }
}

/// `{count, schedules, warnings}`; cada horario es una lista de secciones.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub count: usize,
    pub schedules: Vec<Schedule>,
    pub warnings: Vec<Warning>,
}

impl From<GenerationOutcome> for GenerateResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            count: outcome.count(),
            schedules: outcome.schedules,
            warnings: outcome.warnings,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedSchedulesQuery {
    pub user_id: String,
    #[serde(default)]
    pub term_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerQuery {
    pub user_id: String,
}
