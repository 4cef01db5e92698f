// Estructuras de datos principales: días, categorías, secciones, cursos y horarios.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri];

    pub fn symbol(&self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Tipo de sección. `Lecture` es la única categoría primaria; el resto son
/// secundarias y se adjuntan en el orden de `Category::SECONDARY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Lecture,
    Discussion,
    Lab,
    Quiz,
}

impl Category {
    /// Orden de prioridad fijo para adjuntar secciones secundarias.
    pub const SECONDARY: [Category; 3] = [Category::Discussion, Category::Lab, Category::Quiz];

    /// Discussion es obligatoria: si no cabe, el intento completo falla.
    /// Lab y Quiz se adjuntan sólo si es posible.
    pub fn is_required_secondary(self) -> bool {
        self == Category::Discussion
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Lecture => "Lecture",
            Category::Discussion => "Discussion",
            Category::Lab => "Lab",
            Category::Quiz => "Quiz",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Una franja de reunión concreta de un curso.
///
/// Sin `start_time` la sección es TBA y nunca entra en conflicto. Si hay
/// `start_time` también hay `end_time` y `end_time >= start_time`; esto lo
/// garantiza la ingesta (`catalog::payload`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub course_id: String,
    pub category: Category,
    #[serde(default)]
    pub days: BTreeSet<Weekday>,
    #[serde(default, with = "hhmm")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub instructors: Vec<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub registered: Option<u32>,
    #[serde(default)]
    pub waitlist: Option<u32>,
    #[serde(default)]
    pub session: Option<String>,
}

impl Section {
    /// Sección TBA sin metadatos.
    pub fn new(id: impl Into<String>, course_id: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            course_id: course_id.into(),
            category,
            days: BTreeSet::new(),
            start_time: None,
            end_time: None,
            location: None,
            instructors: Vec::new(),
            capacity: None,
            registered: None,
            waitlist: None,
            session: None,
        }
    }

    pub fn with_meeting(mut self, days: &[Weekday], start: NaiveTime, end: NaiveTime) -> Self {
        self.days = days.iter().copied().collect();
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Intervalo `[inicio, fin]` si la sección tiene hora asignada.
    pub fn meeting_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        match (self.start_time, self.end_time) {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        }
    }

    pub fn is_tba(&self) -> bool {
        self.meeting_window().is_none()
    }
}

/// Oferta publicada de un curso con sus secciones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub published_course_id: String,
    #[serde(default)]
    pub scheduled_course_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub description: Option<String>,
    pub sections: Vec<Section>,
}

/// Clave de deduplicación: ids de sección ordenados.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionKey(Vec<String>);

impl SectionKey {
    pub fn from_sections<'a, I>(sections: I) -> Self
    where
        I: IntoIterator<Item = &'a Section>,
    {
        let mut ids: Vec<String> = sections.into_iter().map(|s| s.id.clone()).collect();
        ids.sort();
        SectionKey(ids)
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(","))
    }
}

/// Horario candidato: lecturas más secundarias adjuntas, sin conflictos
/// internos. Se serializa como la lista de secciones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    sections: Vec<Section>,
}

impl Schedule {
    pub(crate) fn from_sections(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn key(&self) -> SectionKey {
        SectionKey::from_sections(&self.sections)
    }

    /// Ids en el orden del horario; es lo que consume el almacenamiento.
    pub fn section_ids(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections_for_course(&self, course_id: &str) -> Vec<&Section> {
        self.sections.iter().filter(|s| s.course_id == course_id).collect()
    }
}

/// Serializa horas como "HH:MM". Al leer acepta también "HH:MM:SS".
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => NaiveTime::parse_from_str(&s, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
