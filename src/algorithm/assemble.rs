// Armado de un horario a partir de una combinación de lecturas.
use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::algorithm::classify::ClassifiedCourse;
use crate::algorithm::combinations::LectureCombination;
use crate::algorithm::conflict::{conflicts_with_any, has_internal_conflict};
use crate::models::{Category, Schedule, Section, SectionKey};

/// Intentos independientes de armado por combinación de lecturas.
pub const ATTEMPTS_PER_COMBINATION: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyOutcome {
    /// Horario nuevo, sin conflictos.
    Assembled(Schedule),
    /// El horario resultante ya estaba entre los vistos.
    Duplicate(SectionKey),
    /// Las lecturas de la combinación chocan entre sí.
    LectureConflict,
    /// Ninguna sección de una categoría obligatoria cabe en el horario.
    MissingRequired { course_id: String, category: Category },
}

/// Intenta adjuntar una sección secundaria por categoría y por curso.
///
/// `courses` son sólo los cursos con Lecture. Para cada uno (en el orden
/// recibido) y cada categoría secundaria observada (Discussion, Lab, Quiz)
/// se barajan las secciones de esa categoría y se toma la primera que no
/// choque con lo ya elegido. Si Discussion no
/// cabe el intento falla; si Lab o Quiz no caben se sigue sin ellas.
///
/// Cada llamada es un intento independiente: no hay backtracking sobre
/// intentos anteriores.
pub fn assemble_schedule<R: Rng + ?Sized>(
    combo: &LectureCombination,
    courses: &[ClassifiedCourse],
    seen: &HashSet<SectionKey>,
    rng: &mut R,
) -> AssemblyOutcome {
    if has_internal_conflict(combo.sections()) {
        return AssemblyOutcome::LectureConflict;
    }

    let mut chosen: Vec<Section> = combo.sections().to_vec();

    for course in courses.iter() {
        for &category in course.secondary_categories() {
            let mut trial: Vec<&Section> = course.sections_of(category).iter().collect();
            trial.shuffle(rng);

            match trial.into_iter().find(|s| !conflicts_with_any(s, &chosen)) {
                Some(s) => chosen.push(s.clone()),
                None if category.is_required_secondary() => {
                    return AssemblyOutcome::MissingRequired {
                        course_id: course.course_id.clone(),
                        category,
                    };
                }
                None => {}
            }
        }
    }

    let schedule = Schedule::from_sections(chosen);
    let key = schedule.key();
    if seen.contains(&key) {
        AssemblyOutcome::Duplicate(key)
    } else {
        AssemblyOutcome::Assembled(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::classify::classify_course;
    use crate::models::{Course, Weekday::*};
    use chrono::NaiveTime;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn classified(id: &str, sections: Vec<Section>) -> ClassifiedCourse {
        classify_course(&Course {
            published_course_id: id.to_string(),
            scheduled_course_id: None,
            title: id.to_string(),
            units: "4.0".to_string(),
            description: None,
            sections,
        })
    }

    #[test]
    fn test_attaches_discussion_and_skips_blocked_lab() {
        let lecture = Section::new("L1", "CHEM-105", Category::Lecture).with_meeting(&[Mon, Wed], t(9, 0), t(9, 50));
        let disc = Section::new("D1", "CHEM-105", Category::Discussion).with_meeting(&[Fri], t(9, 0), t(9, 50));
        // el único Lab choca con la lectura
        let lab = Section::new("B1", "CHEM-105", Category::Lab).with_meeting(&[Mon], t(9, 30), t(12, 0));
        let course = classified("CHEM-105", vec![lecture.clone(), disc, lab]);
        let combo = LectureCombination::new(vec![lecture]);

        let mut rng = StdRng::seed_from_u64(7);
        match assemble_schedule(&combo, &[course], &HashSet::new(), &mut rng) {
            AssemblyOutcome::Assembled(s) => {
                assert_eq!(s.section_ids(), vec!["L1".to_string(), "D1".to_string()]);
                assert!(!has_internal_conflict(s.sections()));
            }
            other => panic!("se esperaba un horario, llegó {:?}", other),
        }
    }

    #[test]
    fn test_blocked_discussion_fails_attempt() {
        let lecture = Section::new("L1", "PHYS-151", Category::Lecture).with_meeting(&[Tue, Thu], t(10, 0), t(11, 15));
        let disc = Section::new("D1", "PHYS-151", Category::Discussion).with_meeting(&[Thu], t(11, 15), t(12, 5));
        let course = classified("PHYS-151", vec![lecture.clone(), disc]);
        let combo = LectureCombination::new(vec![lecture]);

        let mut rng = StdRng::seed_from_u64(1);
        let outcome = assemble_schedule(&combo, &[course], &HashSet::new(), &mut rng);
        assert_eq!(
            outcome,
            AssemblyOutcome::MissingRequired { course_id: "PHYS-151".to_string(), category: Category::Discussion }
        );
    }

    #[test]
    fn test_conflicting_lectures_rejected() {
        let a = Section::new("A1", "A-1", Category::Lecture).with_meeting(&[Mon], t(9, 0), t(10, 0));
        let b = Section::new("B1", "B-1", Category::Lecture).with_meeting(&[Mon], t(9, 30), t(10, 30));
        let courses = vec![classified("A-1", vec![a.clone()]), classified("B-1", vec![b.clone()])];
        let combo = LectureCombination::new(vec![a, b]);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(assemble_schedule(&combo, &courses, &HashSet::new(), &mut rng), AssemblyOutcome::LectureConflict);
    }

    #[test]
    fn test_duplicate_is_reported() {
        let lecture = Section::new("L1", "ECON-203", Category::Lecture);
        let course = classified("ECON-203", vec![lecture.clone()]);
        let combo = LectureCombination::new(vec![lecture]);
        let mut seen = HashSet::new();
        seen.insert(combo.key());

        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(
            assemble_schedule(&combo, &[course], &seen, &mut rng),
            AssemblyOutcome::Duplicate(combo.key())
        );
    }
}
