//! Formato del payload cacheado por departamento y su conversión a modelos.
//!
//! Es la única puerta de entrada de datos de secciones: días, horas y tipos
//! mal formados se rechazan aquí con `InvalidInput` en vez de corregirse.
//! La única ausencia tolerada es TBA (`null`, `""` o `"TBA"`).

use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ScheduleError};
use crate::models::{Category, Course, Section, Weekday};

/// Payload completo de un departamento para un término.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentPayload {
    pub department: String,
    pub term_id: i64,
    #[serde(default)]
    pub courses: Vec<RawCourse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCourse {
    pub published_course_id: String,
    #[serde(default)]
    pub scheduled_course_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub units: Value,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sections: Vec<RawSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSection {
    pub id: Value,
    #[serde(default)]
    pub session: Value,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub registered: Option<i64>,
    #[serde(default)]
    pub wait_quantity: Option<i64>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub instructors: Vec<RawInstructor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInstructor {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

pub fn parse_department_payload(json_str: &str) -> Result<DepartmentPayload> {
    Ok(serde_json::from_str::<DepartmentPayload>(json_str)?)
}

impl DepartmentPayload {
    /// Convierte todos los cursos; falla con el primer curso inválido.
    pub fn to_courses(&self) -> Result<Vec<Course>> {
        self.courses.iter().map(RawCourse::to_course).collect()
    }

    pub fn find(&self, course_id: &str) -> Option<&RawCourse> {
        self.courses
            .iter()
            .find(|c| c.published_course_id.trim().eq_ignore_ascii_case(course_id.trim()))
    }
}

impl RawCourse {
    pub fn to_course(&self) -> Result<Course> {
        let course_id = self.published_course_id.trim().to_string();
        if course_id.is_empty() {
            return Err(ScheduleError::invalid("course without published_course_id"));
        }
        if self.sections.is_empty() {
            return Err(ScheduleError::invalid(format!("course {} has no sections", course_id)));
        }
        let sections = self
            .sections
            .iter()
            .map(|s| s.to_section(&course_id))
            .collect::<Result<Vec<Section>>>()?;

        Ok(Course {
            published_course_id: course_id,
            scheduled_course_id: self.scheduled_course_id.clone(),
            title: self.title.trim().to_string(),
            units: scalar_to_string(&self.units).unwrap_or_default(),
            description: self.description.clone(),
            sections,
        })
    }
}

impl RawSection {
    pub fn to_section(&self, course_id: &str) -> Result<Section> {
        let id = scalar_to_string(&self.id)
            .ok_or_else(|| ScheduleError::invalid(format!("section of {} without id", course_id)))?;
        let context = |msg: String| ScheduleError::invalid(format!("section {} of {}: {}", id, course_id, msg));

        let category = parse_category(self.kind.as_deref().unwrap_or(""))
            .map_err(|e| context(detail(e)))?;
        let days = parse_days(self.day.as_deref().unwrap_or("")).map_err(|e| context(detail(e)))?;
        let start = parse_time(self.start_time.as_deref().unwrap_or("")).map_err(|e| context(detail(e)))?;
        let end = parse_time(self.end_time.as_deref().unwrap_or("")).map_err(|e| context(detail(e)))?;

        match (start, end) {
            (Some(s), Some(e)) if e < s => {
                return Err(context(format!("end_time {} is before start_time {}", e.format("%H:%M"), s.format("%H:%M"))));
            }
            (Some(_), None) => return Err(context("start_time without end_time".to_string())),
            (None, Some(_)) => return Err(context("end_time without start_time".to_string())),
            _ => {}
        }

        let instructors: Vec<String> = self
            .instructors
            .iter()
            .map(|i| {
                let first = i.first_name.as_deref().unwrap_or("").trim();
                let last = i.last_name.as_deref().unwrap_or("").trim();
                format!("{} {}", first, last).trim().to_string()
            })
            .filter(|n| !n.is_empty())
            .collect();

        let location = self
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.eq_ignore_ascii_case("TBA"))
            .map(str::to_string);

        Ok(Section {
            id,
            course_id: course_id.to_string(),
            category,
            days,
            start_time: start,
            end_time: end,
            location,
            instructors,
            capacity: self.capacity.and_then(|v| u32::try_from(v).ok()),
            registered: self.registered.and_then(|v| u32::try_from(v).ok()),
            waitlist: self.wait_quantity.and_then(|v| u32::try_from(v).ok()),
            session: scalar_to_string(&self.session),
        })
    }
}

fn detail(e: ScheduleError) -> String {
    match e {
        ScheduleError::InvalidInput(msg) => msg,
        other => other.to_string(),
    }
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_tba(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.eq_ignore_ascii_case("TBA")
}

/// Tipo de sección del registro. Los tipos combinados `Lecture-*` cuentan
/// como Lecture.
pub fn parse_category(raw: &str) -> Result<Category> {
    let lower = raw.trim().to_ascii_lowercase();
    let cat = match lower.as_str() {
        "lecture" | "lec" => Category::Lecture,
        "discussion" | "dis" => Category::Discussion,
        "lab" | "laboratory" => Category::Lab,
        "quiz" | "qz" => Category::Quiz,
        other if other.starts_with("lecture-") => Category::Lecture,
        _ => return Err(ScheduleError::invalid(format!("unknown section type '{}'", raw.trim()))),
    };
    Ok(cat)
}

fn day_from_name(token: &str) -> Option<Weekday> {
    match token.to_ascii_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tues" | "tuesday" => Some(Weekday::Tue),
        "wed" | "weds" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thur" | "thurs" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        _ => None,
    }
}

fn day_from_letter(c: char) -> Option<Weekday> {
    match c {
        'M' => Some(Weekday::Mon),
        'T' => Some(Weekday::Tue),
        'W' => Some(Weekday::Wed),
        'H' | 'R' => Some(Weekday::Thu),
        'F' => Some(Weekday::Fri),
        _ => None,
    }
}

fn day_from_short(token: &str) -> Option<Weekday> {
    match token.to_ascii_lowercase().as_str() {
        "mo" => Some(Weekday::Mon),
        "tu" => Some(Weekday::Tue),
        "we" => Some(Weekday::Wed),
        "th" => Some(Weekday::Thu),
        "fr" => Some(Weekday::Fri),
        _ => None,
    }
}

/// Días de reunión. Acepta letras compactas del registro en mayúsculas
/// (`"MWF"`, `"TH"` = martes y jueves), nombres separados por comas/espacios
/// (`"Mon, Wed"`) y abreviaturas de dos letras (`"Tu"`, `"Th"`).
pub fn parse_days(raw: &str) -> Result<BTreeSet<Weekday>> {
    let mut days = BTreeSet::new();
    if is_tba(raw) {
        return Ok(days);
    }
    for token in raw.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty()) {
        if let Some(d) = day_from_name(token) {
            days.insert(d);
            continue;
        }
        if !token.chars().all(|c| c.is_ascii_uppercase()) {
            // fuera de la forma compacta sólo se aceptan "Tu", "Th", etc.
            match day_from_short(token) {
                Some(d) => {
                    days.insert(d);
                    continue;
                }
                _ => return Err(ScheduleError::invalid(format!("unknown day token '{}' in \"{}\"", token, raw.trim()))),
            }
        }
        for c in token.chars() {
            match day_from_letter(c) {
                Some(d) => {
                    days.insert(d);
                }
                None => {
                    return Err(ScheduleError::invalid(format!("unknown day symbol '{}' in \"{}\"", c, raw.trim())));
                }
            }
        }
    }
    Ok(days)
}

/// Hora `HH:MM` en 24h, opcionalmente con sufijo am/pm. TBA -> `None`.
pub fn parse_time(raw: &str) -> Result<Option<NaiveTime>> {
    if is_tba(raw) {
        return Ok(None);
    }
    let bad = || ScheduleError::invalid(format!("malformed time '{}'", raw.trim()));

    let lower = raw.trim().to_ascii_lowercase();
    let (body, meridiem) = if let Some(b) = lower.strip_suffix("am") {
        (b.trim(), Some(false))
    } else if let Some(b) = lower.strip_suffix("pm") {
        (b.trim(), Some(true))
    } else {
        (lower.as_str(), None)
    };

    let (hh, mm) = body.split_once(':').ok_or_else(bad)?;
    let mut hour: u32 = hh.trim().parse().map_err(|_| bad())?;
    let minute: u32 = mm.trim().parse().map_err(|_| bad())?;

    if let Some(pm) = meridiem {
        if !(1..=12).contains(&hour) {
            return Err(bad());
        }
        hour = match (pm, hour) {
            (false, 12) => 0,
            (true, 12) => 12,
            (true, h) => h + 12,
            (false, h) => h,
        };
    }

    NaiveTime::from_hms_opt(hour, minute, 0).map(Some).ok_or_else(bad)
}
