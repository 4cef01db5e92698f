// Enumeración del producto cartesiano de lecturas (una por curso).
use crate::algorithm::classify::ClassifiedCourse;
use crate::models::{Section, SectionKey};

/// Una elección de exactamente una Lecture por curso participante.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureCombination {
    sections: Vec<Section>,
}

impl LectureCombination {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn key(&self) -> SectionKey {
        SectionKey::from_sections(&self.sections)
    }
}

/// Resultado de la enumeración: combinaciones candidatas y cursos que
/// quedaron fuera del producto por no tener ninguna Lecture.
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    pub combinations: Vec<LectureCombination>,
    pub skipped_courses: Vec<String>,
}

/// Materializa el producto completo en el orden de los cursos.
///
/// Un curso sin lecturas no restringe el producto y se reporta en
/// `skipped_courses`. Si ningún curso tiene lecturas el espacio queda vacío.
pub fn enumerate_lecture_combinations(courses: &[ClassifiedCourse]) -> Enumeration {
    let mut skipped_courses = Vec::new();
    let mut groups: Vec<&[Section]> = Vec::new();
    for c in courses.iter() {
        if c.lectures().is_empty() {
            skipped_courses.push(c.course_id.clone());
        } else {
            groups.push(c.lectures());
        }
    }

    if groups.is_empty() {
        return Enumeration { combinations: Vec::new(), skipped_courses };
    }

    let mut partial: Vec<Vec<Section>> = vec![Vec::new()];
    for group in groups.iter() {
        let mut next = Vec::with_capacity(partial.len() * group.len());
        for prefix in partial.iter() {
            for lecture in group.iter() {
                let mut combo = prefix.clone();
                combo.push(lecture.clone());
                next.push(combo);
            }
        }
        partial = next;
    }

    Enumeration {
        combinations: partial.into_iter().map(LectureCombination::new).collect(),
        skipped_courses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::classify::classify_course;
    use crate::models::{Category, Course};

    fn course(id: &str, lectures: usize, discussions: usize) -> ClassifiedCourse {
        let mut sections = Vec::new();
        for i in 0..lectures {
            sections.push(Section::new(format!("{id}-L{i}"), id, Category::Lecture));
        }
        for i in 0..discussions {
            sections.push(Section::new(format!("{id}-D{i}"), id, Category::Discussion));
        }
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
    fn test_product_size_and_shape() {
        let e = enumerate_lecture_combinations(&[course("A", 2, 1), course("B", 3, 0)]);
        assert_eq!(e.combinations.len(), 6);
        assert!(e.skipped_courses.is_empty());
        for combo in e.combinations.iter() {
            assert_eq!(combo.sections().len(), 2);
            assert_eq!(combo.sections()[0].course_id, "A");
            assert_eq!(combo.sections()[1].course_id, "B");
        }
        let mut keys: Vec<_> = e.combinations.iter().map(|c| c.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 6);
    }

    #[test]
    fn test_lectureless_course_is_skipped() {
        let e = enumerate_lecture_combinations(&[course("A", 2, 0), course("B", 0, 2)]);
        assert_eq!(e.combinations.len(), 2);
        assert_eq!(e.skipped_courses, vec!["B".to_string()]);
    }

    #[test]
    fn test_no_lectures_anywhere_yields_empty_space() {
        let e = enumerate_lecture_combinations(&[course("A", 0, 1)]);
        assert!(e.combinations.is_empty());
        assert_eq!(e.skipped_courses, vec!["A".to_string()]);

        let none = enumerate_lecture_combinations(&[]);
        assert!(none.combinations.is_empty());
    }
}
