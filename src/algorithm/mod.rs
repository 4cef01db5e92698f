// Motor de generación de horarios.
// Submódulos de hojas a raíz: conflicto -> clasificación -> enumeración ->
// armado -> control de diversidad.
pub mod assemble;
pub mod classify;
pub mod combinations;
pub mod conflict;
pub mod diversity;
pub mod events;

pub use conflict::sections_conflict;
pub use diversity::{DEFAULT_MAX_SCHEDULES, ScheduleSearch, SearchOptions};
pub use events::{NoopObserver, SearchEvent, SearchObserver, TracingObserver};

use rand::Rng;
use serde::Serialize;

use crate::catalog::CourseCatalog;
use crate::error::{Result, ScheduleError};
use crate::models::{Course, Schedule};

/// Avisos que acompañan a un resultado exitoso.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// El catálogo no tiene el curso para el término pedido; se omitió.
    CourseNotFound { course_id: String },
    /// El curso no tiene ninguna Lecture; no restringe las combinaciones.
    NoLectureSections { course_id: String },
}

#[derive(Debug, Clone, Default)]
pub struct GenerationOutcome {
    pub schedules: Vec<Schedule>,
    pub warnings: Vec<Warning>,
}

impl GenerationOutcome {
    pub fn count(&self) -> usize {
        self.schedules.len()
    }
}

/// Recorta, pasa a mayúsculas y elimina repetidos conservando el orden.
pub fn normalize_course_ids(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for r in raw.iter() {
        let id = r.trim().to_uppercase();
        if !id.is_empty() && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// Punto de entrada de una petición: resuelve los cursos contra el catálogo
/// y ejecuta la búsqueda.
///
/// Los cursos que no existen se omiten con un aviso; si no se resuelve
/// ninguno la petición falla con `NoResolvableCourses`. Cero horarios es un
/// resultado válido.
pub fn generate_schedules<C, R, O>(
    catalog: &C,
    term_id: i64,
    course_ids: &[String],
    options: &SearchOptions,
    rng: &mut R,
    observer: &mut O,
) -> Result<GenerationOutcome>
where
    C: CourseCatalog + ?Sized,
    R: Rng + ?Sized,
    O: SearchObserver + ?Sized,
{
    let requested = normalize_course_ids(course_ids);
    if requested.is_empty() {
        return Err(ScheduleError::invalid("course list is empty"));
    }
    if options.max_schedules == 0 {
        return Err(ScheduleError::invalid("max_schedules must be at least 1"));
    }

    let mut warnings: Vec<Warning> = Vec::new();
    let mut courses: Vec<Course> = Vec::new();
    for id in requested.iter() {
        match catalog.find_course(term_id, id)? {
            Some(c) => courses.push(c),
            None => warnings.push(Warning::CourseNotFound { course_id: id.clone() }),
        }
    }

    if courses.is_empty() {
        return Err(ScheduleError::NoResolvableCourses { term_id, requested });
    }

    let search = ScheduleSearch::new(&courses);
    warnings.extend(
        search
            .skipped_courses()
            .iter()
            .map(|id| Warning::NoLectureSections { course_id: id.clone() }),
    );

    let schedules = search.run(options, rng, observer);
    Ok(GenerationOutcome { schedules, warnings })
}
