//! Runtime configuration for the tournament server, read from the environment.

use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: String,
    /// Postgres connection string; in-memory repositories when absent.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// Apply `migrations/` at startup.
    pub run_migrations: bool,
    /// Insert the built-in sports catalogue when missing.
    pub seed_sports: bool,
    pub cors_allow_any_origin: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3001".to_string(),
            database_url: None,
            db_max_connections: 10,
            run_migrations: true,
            seed_sports: true,
            cors_allow_any_origin: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let db_max_connections = match non_empty("DB_MAX_CONNECTIONS") {
            Some(value) => {
                let parsed = value.trim().parse::<u32>().ok().filter(|n| *n > 0);
                parsed.ok_or(ConfigError::InvalidValue {
                    name: "DB_MAX_CONNECTIONS",
                    value,
                })?
            }
            None => defaults.db_max_connections,
        };

        Ok(Self {
            bind_addr: non_empty("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: non_empty("DATABASE_URL").or_else(|| non_empty("DB_URL")),
            db_max_connections,
            run_migrations: parse_bool(
                "RUN_MIGRATIONS",
                non_empty("RUN_MIGRATIONS"),
                defaults.run_migrations,
            )?,
            seed_sports: parse_bool("SEED_SPORTS", non_empty("SEED_SPORTS"), defaults.seed_sports)?,
            cors_allow_any_origin: parse_bool(
                "CORS_ALLOW_ANY_ORIGIN",
                non_empty("CORS_ALLOW_ANY_ORIGIN"),
                defaults.cors_allow_any_origin,
            )?,
        })
    }
}

fn parse_bool(
    name: &'static str,
    value: Option<String>,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { name, value }),
    }
}
