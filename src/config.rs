// Configuración del servicio leída de variables de entorno (y `.env` si existe).
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::algorithm::DEFAULT_MAX_SCHEDULES;
use crate::error::{Result, ScheduleError};

/// Tope máximo aceptado en `max_schedules` por petición.
pub const MAX_SCHEDULES_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Base SQLite compartida por la caché de catálogo y los horarios guardados.
    pub db_path: PathBuf,
    pub cors_origin: String,
    pub default_max_schedules: usize,
    pub generation_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            db_path: PathBuf::from("data/classshift.db"),
            cors_origin: "http://localhost:3000".to_string(),
            default_max_schedules: DEFAULT_MAX_SCHEDULES,
            generation_timeout_ms: 10_000,
        }
    }
}

fn load_dotenv() {
    let _ = dotenv::dotenv();
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables inyectable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let cfg = AppConfig {
            bind_addr: get("CLASSSHIFT_BIND").unwrap_or(defaults.bind_addr),
            db_path: get("CLASSSHIFT_DB_PATH").map(PathBuf::from).unwrap_or(defaults.db_path),
            cors_origin: get("CLASSSHIFT_CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            default_max_schedules: parse_var("CLASSSHIFT_MAX_SCHEDULES", get("CLASSSHIFT_MAX_SCHEDULES"))?
                .unwrap_or(defaults.default_max_schedules),
            generation_timeout_ms: parse_var("CLASSSHIFT_TIMEOUT_MS", get("CLASSSHIFT_TIMEOUT_MS"))?
                .unwrap_or(defaults.generation_timeout_ms),
        };

        if cfg.default_max_schedules == 0 || cfg.default_max_schedules > MAX_SCHEDULES_LIMIT {
            return Err(ScheduleError::Config(format!(
                "CLASSSHIFT_MAX_SCHEDULES must be between 1 and {}",
                MAX_SCHEDULES_LIMIT
            )));
        }
        if cfg.generation_timeout_ms == 0 {
            return Err(ScheduleError::Config("CLASSSHIFT_TIMEOUT_MS must be positive".to_string()));
        }
        Ok(cfg)
    }
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>) -> Result<Option<T>> {
    match value {
        None => Ok(None),
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|_| ScheduleError::Config(format!("{} has an invalid value: '{}'", key, v))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.default_max_schedules, 15);
    }

    #[test]
    fn test_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("CLASSSHIFT_BIND", "0.0.0.0:9000"),
            ("CLASSSHIFT_DB_PATH", "/tmp/x.db"),
            ("CLASSSHIFT_MAX_SCHEDULES", "20"),
            ("CLASSSHIFT_TIMEOUT_MS", " 2500 "),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(cfg.default_max_schedules, 20);
        assert_eq!(cfg.generation_timeout_ms, 2500);
    }

    #[test]
    fn test_invalid_numbers() {
        let err = AppConfig::from_lookup(lookup(&[("CLASSSHIFT_MAX_SCHEDULES", "many")])).unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(AppConfig::from_lookup(lookup(&[("CLASSSHIFT_MAX_SCHEDULES", "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("CLASSSHIFT_TIMEOUT_MS", "-5")])).is_err());
    }
}
