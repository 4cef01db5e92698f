//! Horarios guardados por los usuarios.
//!
//! Colaborador de persistencia separado del motor: recibe la lista de ids de
//! sección de un horario elegido más un nombre y un término. El motor nunca
//! lo invoca.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSavedSchedule {
    pub user_id: String,
    pub term_id: i64,
    pub name: String,
    pub sections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSchedule {
    pub id: i64,
    pub user_id: String,
    pub term_id: i64,
    pub name: String,
    pub sections: Vec<String>,
    pub created_at: String,
}

impl NewSavedSchedule {
    fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ScheduleError::invalid("user_id is required"));
        }
        if self.name.trim().is_empty() {
            return Err(ScheduleError::invalid("name is required"));
        }
        if self.sections.iter().all(|s| s.trim().is_empty()) {
            return Err(ScheduleError::invalid("a saved schedule needs at least one section"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleStore {
    db_path: PathBuf,
}

impl ScheduleStore {
    /// Abre (o crea) la base y asegura la tabla `saved_schedules`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(dir) = db_path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let store = Self { db_path };
        let conn = store.connect()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS saved_schedules (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                term_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                sections TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(store)
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db_path)?)
    }

    pub fn save(&self, new: &NewSavedSchedule) -> Result<SavedSchedule> {
        new.validate()?;
        let sections: Vec<String> = new
            .sections
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let sections_json = serde_json::to_string(&sections)?;
        let created_at = Utc::now().to_rfc3339();

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO saved_schedules (user_id, term_id, name, sections, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![new.user_id.trim(), new.term_id, new.name.trim(), sections_json, created_at],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(event = "schedule_saved", id, term_id = new.term_id, sections = sections.len());

        Ok(SavedSchedule {
            id,
            user_id: new.user_id.trim().to_string(),
            term_id: new.term_id,
            name: new.name.trim().to_string(),
            sections,
            created_at,
        })
    }

    /// Horarios del usuario, más recientes primero.
    pub fn list_for_user(&self, user_id: &str, term_id: Option<i64>) -> Result<Vec<SavedSchedule>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, term_id, name, sections, created_at FROM saved_schedules
             WHERE user_id = ?1 AND (?2 IS NULL OR term_id = ?2)
             ORDER BY id DESC",
        )?;
        let rows = stmt.query_map(params![user_id.trim(), term_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut out = Vec::new();
        for r in rows {
            let (id, user_id, term_id, name, sections_json, created_at) = r?;
            let sections: Vec<String> = serde_json::from_str(&sections_json)?;
            out.push(SavedSchedule { id, user_id, term_id, name, sections, created_at });
        }
        Ok(out)
    }

    /// Borra un horario del usuario. `false` si no existía o era de otro.
    pub fn delete(&self, user_id: &str, id: i64) -> Result<bool> {
        let conn = self.connect()?;
        let n = conn.execute(
            "DELETE FROM saved_schedules WHERE id = ?1 AND user_id = ?2",
            params![id, user_id.trim()],
        )?;
        Ok(n > 0)
    }
}
