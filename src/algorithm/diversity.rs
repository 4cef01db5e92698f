// Control de la búsqueda: orden aleatorio, descarte de combinaciones
// fallidas o repetidas, tope de resultados y condición de parada.
use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::algorithm::assemble::{ATTEMPTS_PER_COMBINATION, AssemblyOutcome, assemble_schedule};
use crate::algorithm::classify::{ClassifiedCourse, classify_course};
use crate::algorithm::combinations::{Enumeration, enumerate_lecture_combinations};
use crate::algorithm::conflict::has_internal_conflict;
use crate::algorithm::events::{SearchEvent, SearchObserver};
use crate::error::{Result, ScheduleError};
use crate::models::{Course, Schedule, SectionKey};

pub const DEFAULT_MAX_SCHEDULES: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_schedules: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { max_schedules: DEFAULT_MAX_SCHEDULES }
    }
}

impl SearchOptions {
    pub fn with_max_schedules(max_schedules: usize) -> Result<Self> {
        if max_schedules == 0 {
            return Err(ScheduleError::invalid("max_schedules must be at least 1"));
        }
        Ok(Self { max_schedules })
    }
}

/// Estado local de una petición. Se crea en cada `run` y se descarta al volver.
#[derive(Debug, Default)]
struct SearchState {
    tried: HashSet<SectionKey>,
    failed: HashSet<SectionKey>,
    returned: HashSet<SectionKey>,
}

/// Cursos clasificados y espacio de combinaciones de lecturas ya preparados.
#[derive(Debug, Clone)]
pub struct ScheduleSearch {
    /// Sólo los cursos con al menos una Lecture; los demás no restringen nada.
    participating: Vec<ClassifiedCourse>,
    enumeration: Enumeration,
}

impl ScheduleSearch {
    pub fn new(courses: &[Course]) -> Self {
        let classified: Vec<ClassifiedCourse> = courses.iter().map(classify_course).collect();
        let enumeration = enumerate_lecture_combinations(&classified);
        let participating = classified.into_iter().filter(|c| !c.lectures().is_empty()).collect();
        Self { participating, enumeration }
    }

    /// Cursos que no aportan ninguna Lecture y quedaron fuera del producto.
    pub fn skipped_courses(&self) -> &[String] {
        &self.enumeration.skipped_courses
    }

    pub fn combination_count(&self) -> usize {
        self.enumeration.combinations.len()
    }

    /// Recorre una sola vez una permutación aleatoria de las combinaciones y
    /// devuelve entre 0 y `max_schedules` horarios distintos y sin conflictos.
    pub fn run<R, O>(&self, options: &SearchOptions, rng: &mut R, observer: &mut O) -> Vec<Schedule>
    where
        R: Rng + ?Sized,
        O: SearchObserver + ?Sized,
    {
        let mut accepted: Vec<Schedule> = Vec::new();
        if options.max_schedules == 0 {
            return accepted;
        }

        let combinations = &self.enumeration.combinations;
        let mut order: Vec<usize> = (0..self.combination_count()).collect();
        order.shuffle(rng);

        let mut state = SearchState::default();

        'combos: for idx in order {
            let combo = &combinations[idx];
            let key = combo.key();

            if state.failed.contains(&key) || !state.tried.insert(key.clone()) {
                observer.on_event(&SearchEvent::SkippedFailed { key });
                continue;
            }
            observer.on_event(&SearchEvent::CombinationTried { key: key.clone() });

            if has_internal_conflict(combo.sections()) {
                observer.on_event(&SearchEvent::LectureConflict { key: key.clone() });
                state.failed.insert(key);
                continue;
            }

            let mut produced = false;
            for _ in 0..ATTEMPTS_PER_COMBINATION {
                match assemble_schedule(combo, &self.participating, &state.returned, rng) {
                    AssemblyOutcome::Assembled(schedule) => {
                        produced = true;
                        let schedule_key = schedule.key();
                        state.returned.insert(schedule_key.clone());
                        accepted.push(schedule);
                        observer.on_event(&SearchEvent::Accepted { key: schedule_key, total: accepted.len() });
                        if accepted.len() >= options.max_schedules {
                            observer.on_event(&SearchEvent::CapReached { total: accepted.len() });
                            return accepted;
                        }
                    }
                    AssemblyOutcome::Duplicate(schedule_key) => {
                        produced = true;
                        observer.on_event(&SearchEvent::DuplicateSkipped { key: schedule_key });
                    }
                    AssemblyOutcome::MissingRequired { course_id, category } => {
                        observer.on_event(&SearchEvent::MissingRequired { key: key.clone(), course_id, category });
                    }
                    AssemblyOutcome::LectureConflict => {
                        observer.on_event(&SearchEvent::LectureConflict { key: key.clone() });
                        state.failed.insert(key);
                        continue 'combos;
                    }
                }
            }
            if !produced {
                state.failed.insert(key);
            }
        }

        observer.on_event(&SearchEvent::Exhausted { total: accepted.len(), combinations: self.combination_count() });
        accepted
    }
}
