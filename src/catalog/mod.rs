//! Colaborador de catálogo (solo lectura para el motor).
//!
//! `CourseCatalog` resuelve `(term_id, course_id)` a un `Course`. Hay dos
//! implementaciones: `InMemoryCatalog` para tests y uso embebido, y
//! `SqliteCatalog`, que lee la caché de payloads por departamento.

pub mod payload;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use crate::error::{Result, ScheduleError};
use crate::models::Course;
pub use payload::{DepartmentPayload, parse_department_payload};

pub trait CourseCatalog {
    /// `Ok(None)` si el curso no existe para ese término.
    fn find_course(&self, term_id: i64, course_id: &str) -> Result<Option<Course>>;
}

/// Departamento de un id de curso: letras iniciales en mayúsculas
/// (`"CSCI-104"` -> `"CSCI"`).
pub fn department_of(course_id: &str) -> Option<String> {
    let dept: String = course_id
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if dept.is_empty() { None } else { Some(dept) }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    courses: HashMap<(i64, String), Course>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, term_id: i64, course: Course) {
        let key = (term_id, course.published_course_id.trim().to_uppercase());
        self.courses.insert(key, course);
    }

    pub fn with_course(mut self, term_id: i64, course: Course) -> Self {
        self.insert(term_id, course);
        self
    }

    /// Carga todos los cursos de un payload de departamento.
    pub fn insert_payload(&mut self, payload: &DepartmentPayload) -> Result<usize> {
        let courses = payload.to_courses()?;
        let n = courses.len();
        for c in courses {
            self.insert(payload.term_id, c);
        }
        Ok(n)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

impl CourseCatalog for InMemoryCatalog {
    fn find_course(&self, term_id: i64, course_id: &str) -> Result<Option<Course>> {
        Ok(self.courses.get(&(term_id, course_id.trim().to_uppercase())).cloned())
    }
}

/// Fila resumida de la caché.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedDepartment {
    pub term_id: i64,
    pub department: String,
    pub course_count: i64,
    pub fetched_at: String,
}

/// Caché de payloads por `(term_id, department)` en SQLite.
///
/// Cada operación abre una conexión corta, así el valor se puede compartir
/// entre hilos sin bloqueo.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    db_path: PathBuf,
}

impl SqliteCatalog {
    /// Abre (o crea) la base y asegura la tabla `course_cache`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(dir) = db_path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let catalog = Self { db_path };
        let conn = catalog.connect()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS course_cache (
                term_id INTEGER NOT NULL,
                department TEXT NOT NULL,
                payload TEXT NOT NULL,
                course_count INTEGER NOT NULL,
                fetched_at TEXT NOT NULL,
                PRIMARY KEY (term_id, department)
            )",
            [],
        )?;
        Ok(catalog)
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db_path)?)
    }

    /// Inserta o reemplaza el payload de un departamento. Antes de guardar se
    /// convierten todos los cursos, de modo que un payload inválido no entra.
    pub fn upsert_department(&self, term_id: i64, department: &str, payload: &DepartmentPayload) -> Result<usize> {
        let department = department.trim().to_uppercase();
        if department.is_empty() {
            return Err(ScheduleError::invalid("department is empty"));
        }
        if payload.term_id != term_id || !payload.department.trim().eq_ignore_ascii_case(&department) {
            return Err(ScheduleError::invalid(format!(
                "payload is for {} / {}, expected {} / {}",
                payload.department, payload.term_id, department, term_id
            )));
        }
        let courses = payload.to_courses()?;
        if let Some(c) = courses
            .iter()
            .find(|c| department_of(&c.published_course_id).as_deref() != Some(department.as_str()))
        {
            return Err(ScheduleError::invalid(format!(
                "course {} does not belong to department {}",
                c.published_course_id, department
            )));
        }

        let body = serde_json::to_string(payload)?;
        let fetched_at = Utc::now().to_rfc3339();
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO course_cache (term_id, department, payload, course_count, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(term_id, department) DO UPDATE SET
                payload = excluded.payload,
                course_count = excluded.course_count,
                fetched_at = excluded.fetched_at",
            params![term_id, department, body, courses.len() as i64, fetched_at],
        )?;
        tracing::info!(event = "catalog_upsert", term_id, department = %department, courses = courses.len());
        Ok(courses.len())
    }

    pub fn load_department(&self, term_id: i64, department: &str) -> Result<Option<DepartmentPayload>> {
        let conn = self.connect()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT payload FROM course_cache WHERE term_id = ?1 AND department = ?2",
                params![term_id, department.trim().to_uppercase()],
                |row| row.get(0),
            )
            .optional()?;
        match body {
            Some(b) => Ok(Some(parse_department_payload(&b)?)),
            None => Ok(None),
        }
    }

    pub fn list_departments(&self, term_id: i64) -> Result<Vec<CachedDepartment>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT term_id, department, course_count, fetched_at FROM course_cache
             WHERE term_id = ?1 ORDER BY department",
        )?;
        let rows = stmt.query_map(params![term_id], |row| {
            Ok(CachedDepartment {
                term_id: row.get(0)?,
                department: row.get(1)?,
                course_count: row.get(2)?,
                fetched_at: row.get(3)?,
            })
        })?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}

impl CourseCatalog for SqliteCatalog {
    fn find_course(&self, term_id: i64, course_id: &str) -> Result<Option<Course>> {
        let Some(dept) = department_of(course_id) else {
            return Ok(None);
        };
        match self.load_department(term_id, &dept)? {
            Some(payload) => payload.find(course_id).map(|raw| raw.to_course()).transpose(),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Section};

    #[test]
    fn test_department_of() {
        assert_eq!(department_of("CSCI-104"), Some("CSCI".to_string()));
        assert_eq!(department_of(" math225 "), Some("MATH".to_string()));
        assert_eq!(department_of("104"), None);
    }

    #[test]
    fn test_in_memory_lookup_is_case_insensitive() {
        let course = Course {
            published_course_id: "CSCI-104".to_string(),
            scheduled_course_id: None,
            title: "Data Structures".to_string(),
            units: "4.0".to_string(),
            description: None,
            sections: vec![Section::new("1", "CSCI-104", Category::Lecture)],
        };
        let cat = InMemoryCatalog::new().with_course(20253, course);
        assert!(cat.find_course(20253, "csci-104").unwrap().is_some());
        assert!(cat.find_course(20251, "CSCI-104").unwrap().is_none());
        assert_eq!(cat.len(), 1);
    }
}
