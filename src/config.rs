use anyhow::{bail, Context};
use serde::Deserialize;

/// Where meals and users are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum StorageBackend {
    Postgres { database_url: String, max_connections: u32 },
    Memory,
}

const MAX_SESSION_DAYS: i64 = 3650;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub max_age_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("STORAGE_BACKEND").as_deref().unwrap_or("postgres") {
            "postgres" => StorageBackend::Postgres {
                database_url: lookup("DATABASE_URL")
                    .context("DATABASE_URL is required for the postgres backend")?,
                max_connections: parse_or("DB_MAX_CONNECTIONS", &lookup, 10)?,
            },
            "memory" => StorageBackend::Memory,
            other => bail!("unknown STORAGE_BACKEND {other:?} (expected postgres or memory)"),
        };

        let max_age_days = parse_or("SESSION_MAX_AGE_DAYS", &lookup, 7)?;
        if !(1..=MAX_SESSION_DAYS).contains(&max_age_days) {
            bail!("SESSION_MAX_AGE_DAYS must be between 1 and {MAX_SESSION_DAYS}, got {max_age_days}");
        }

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or("APP_PORT", &lookup, 3333)?,
            storage,
            session: SessionConfig {
                cookie_name: "sessionId".into(),
                max_age_days,
            },
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_postgres_and_requires_database_url() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let cfg = config_from(&[("DATABASE_URL", "postgres://localhost/diet")]).unwrap();
        assert_eq!(
            cfg.storage,
            StorageBackend::Postgres {
                database_url: "postgres://localhost/diet".into(),
                max_connections: 10,
            }
        );
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 3333);
        assert_eq!(cfg.session.cookie_name, "sessionId");
        assert_eq!(cfg.session.max_age_days, 7);
    }

    #[test]
    fn memory_backend_needs_no_database() {
        let cfg = config_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("APP_PORT", "8080"),
            ("SESSION_MAX_AGE_DAYS", "1"),
        ])
        .unwrap();
        assert_eq!(cfg.storage, StorageBackend::Memory);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.session.max_age_days, 1);
    }

    #[test]
    fn rejects_unknown_backend_and_bad_numbers() {
        assert!(config_from(&[("STORAGE_BACKEND", "sqlite")]).is_err());

        let err = config_from(&[("STORAGE_BACKEND", "memory"), ("APP_PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("APP_PORT"));

        for days in ["0", "-1", "3651", "200000000000000"] {
            let err = config_from(&[("STORAGE_BACKEND", "memory"), ("SESSION_MAX_AGE_DAYS", days)])
                .unwrap_err();
            assert!(err.to_string().contains("SESSION_MAX_AGE_DAYS"), "days {days}");
        }
        let cfg = config_from(&[("STORAGE_BACKEND", "memory"), ("SESSION_MAX_AGE_DAYS", "3650")])
            .unwrap();
        assert_eq!(cfg.session.max_age_days, 3650);
    }
}
