// Clasificación de secciones de un curso por categoría.
use std::collections::BTreeMap;

use crate::models::{Category, Course, Section};

/// Secciones de un curso agrupadas por categoría, ya marcadas con su
/// `course_id`. Se construyen valores nuevos; el `Course` de entrada no se toca.
#[derive(Debug, Clone)]
pub struct ClassifiedCourse {
    pub course_id: String,
    by_category: BTreeMap<Category, Vec<Section>>,
    secondary: Vec<Category>,
}

impl ClassifiedCourse {
    pub fn lectures(&self) -> &[Section] {
        self.sections_of(Category::Lecture)
    }

    pub fn sections_of(&self, category: Category) -> &[Section] {
        self.by_category.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Categorías secundarias observadas, en orden de prioridad.
    pub fn secondary_categories(&self) -> &[Category] {
        &self.secondary
    }
}

pub fn classify_course(course: &Course) -> ClassifiedCourse {
    let mut by_category: BTreeMap<Category, Vec<Section>> = BTreeMap::new();
    for s in course.sections.iter() {
        let mut stamped = s.clone();
        if stamped.course_id.is_empty() {
            stamped.course_id = course.published_course_id.clone();
        }
        by_category.entry(s.category).or_default().push(stamped);
    }

    let secondary = Category::SECONDARY
        .iter()
        .copied()
        .filter(|c| by_category.contains_key(c))
        .collect();

    ClassifiedCourse {
        course_id: course.published_course_id.clone(),
        by_category,
        secondary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(sections: Vec<Section>) -> Course {
        Course {
            published_course_id: "BISC-120".to_string(),
            scheduled_course_id: None,
            title: "General Biology".to_string(),
            units: "4.0".to_string(),
            description: None,
            sections,
        }
    }

    #[test]
    fn test_groups_and_stamps_course_id() {
        let c = course(vec![
            Section::new("1", "", Category::Quiz),
            Section::new("2", "", Category::Lecture),
            Section::new("3", "", Category::Lab),
            Section::new("4", "", Category::Lecture),
        ]);
        let cc = classify_course(&c);

        assert_eq!(cc.course_id, "BISC-120");
        assert_eq!(cc.lectures().len(), 2);
        assert!(cc.lectures().iter().all(|s| s.course_id == "BISC-120"));
        // Lab antes que Quiz aunque Quiz aparezca primero en la oferta
        assert_eq!(cc.secondary_categories(), &[Category::Lab, Category::Quiz]);
        assert!(cc.sections_of(Category::Discussion).is_empty());

        // la entrada queda intacta
        assert!(c.sections.iter().all(|s| s.course_id.is_empty()));
    }

    #[test]
    fn test_course_without_lectures() {
        let c = course(vec![Section::new("9", "BISC-120", Category::Discussion)]);
        let cc = classify_course(&c);
        assert!(cc.lectures().is_empty());
        assert_eq!(cc.secondary_categories(), &[Category::Discussion]);
    }
}
