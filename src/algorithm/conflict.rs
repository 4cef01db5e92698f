// Detección de conflictos de horario entre secciones.
use crate::models::Section;

/// True si dos secciones se solapan en algún día común.
///
/// - Una sección TBA (sin hora) nunca choca con nada, ni con otra TBA.
/// - Sin días en común no hay conflicto.
/// - Con días en común se comparan los intervalos cerrados `[inicio, fin]`:
///   tocarse en un extremo (fin de una == inicio de otra) cuenta como conflicto.
pub fn sections_conflict(a: &Section, b: &Section) -> bool {
    let (Some((a_start, a_end)), Some((b_start, b_end))) = (a.meeting_window(), b.meeting_window()) else {
        return false;
    };
    if a.days.is_disjoint(&b.days) {
        return false;
    }
    a_start <= b_end && b_start <= a_end
}

/// True si `candidate` choca con alguna de las secciones ya elegidas.
pub fn conflicts_with_any<'a, I>(candidate: &Section, chosen: I) -> bool
where
    I: IntoIterator<Item = &'a Section>,
{
    chosen.into_iter().any(|c| sections_conflict(c, candidate))
}

/// True si algún par dentro de `sections` está en conflicto.
pub fn has_internal_conflict(sections: &[Section]) -> bool {
    sections
        .iter()
        .enumerate()
        .any(|(i, a)| sections[i + 1..].iter().any(|b| sections_conflict(a, b)))
}
