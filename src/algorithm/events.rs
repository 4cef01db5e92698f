// Eventos estructurados emitidos por la búsqueda de horarios.
//
// El motor no escribe logs por su cuenta: entrega cada evento a un
// `SearchObserver` inyectado por quien lo invoca.
use crate::models::{Category, SectionKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// Se empieza a trabajar una combinación de lecturas.
    CombinationTried { key: SectionKey },
    /// La combinación ya estaba marcada como fallida o probada.
    SkippedFailed { key: SectionKey },
    /// Dos lecturas de la combinación chocan entre sí.
    LectureConflict { key: SectionKey },
    /// No se pudo adjuntar una categoría obligatoria en un intento.
    MissingRequired { key: SectionKey, course_id: String, category: Category },
    /// El horario armado ya se había devuelto.
    DuplicateSkipped { key: SectionKey },
    /// Horario nuevo aceptado.
    Accepted { key: SectionKey, total: usize },
    /// Se alcanzó el tope de horarios.
    CapReached { total: usize },
    /// Se recorrió toda la lista de combinaciones.
    Exhausted { total: usize, combinations: usize },
}

pub trait SearchObserver {
    fn on_event(&mut self, event: &SearchEvent);
}

/// Descarta todos los eventos.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_event(&mut self, _event: &SearchEvent) {}
}

/// Reenvía los eventos a `tracing` con campos estructurados.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn on_event(&mut self, event: &SearchEvent) {
        match event {
            SearchEvent::CombinationTried { key } => {
                tracing::trace!(event = "combination_tried", key = %key);
            }
            SearchEvent::SkippedFailed { key } => {
                tracing::trace!(event = "combination_skipped", key = %key);
            }
            SearchEvent::LectureConflict { key } => {
                tracing::debug!(event = "lecture_conflict", key = %key);
            }
            SearchEvent::MissingRequired { key, course_id, category } => {
                tracing::debug!(event = "missing_required", key = %key, course = %course_id, category = %category);
            }
            SearchEvent::DuplicateSkipped { key } => {
                tracing::debug!(event = "duplicate_skipped", key = %key);
            }
            SearchEvent::Accepted { key, total } => {
                tracing::debug!(event = "schedule_accepted", key = %key, total = *total);
            }
            SearchEvent::CapReached { total } => {
                tracing::info!(event = "cap_reached", total = *total);
            }
            SearchEvent::Exhausted { total, combinations } => {
                tracing::info!(event = "search_exhausted", total = *total, combinations = *combinations);
            }
        }
    }
}

/// Guarda los eventos en memoria; útil en tests.
impl SearchObserver for Vec<SearchEvent> {
    fn on_event(&mut self, event: &SearchEvent) {
        self.push(event.clone());
    }
}
