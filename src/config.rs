//! Connection settings read from the process environment.
//!
//! Four values are required and have no defaults. A `.env` file in the working
//! directory is honoured, but variables already set in the environment win.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use log::debug;

use crate::error::ConfigError;

pub const HOST_VAR: &str = "DB_HOST_POC";
pub const USER_VAR: &str = "DB_USER_POC";
pub const PASSWORD_VAR: &str = "DB_PASSWORD_POC";
pub const NAME_VAR: &str = "DB_NAME_POC";
pub const PORT_VAR: &str = "DB_PORT_POC";
pub const BACKEND_VAR: &str = "DB_BACKEND_POC";

pub const REQUIRED_VARS: [&str; 4] = [HOST_VAR, USER_VAR, PASSWORD_VAR, NAME_VAR];

pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Which driver the run talks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    MySql,
    Sqlite,
}

impl Backend {
    pub fn label(self) -> &'static str {
        match self {
            Backend::MySql => "MySQL",
            Backend::Sqlite => "SQLite",
        }
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(Backend::MySql),
            "sqlite" => Ok(Backend::Sqlite),
            _ => Err(ConfigError::Invalid {
                name: BACKEND_VAR,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database name for MySQL, file path (or `:memory:`) for SQLite.
    pub database: String,
    pub backend: Backend,
}

// Keeps the password out of logs.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"********")
            .field("database", &self.database)
            .field("backend", &self.backend)
            .finish()
    }
}

impl DbConfig {
    /// Build a config from any key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|name| get(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let port = match get(PORT_VAR) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: PORT_VAR,
                value: raw.clone(),
            })?,
            None => DEFAULT_MYSQL_PORT,
        };
        let backend = match get(BACKEND_VAR) {
            Some(raw) => raw.parse()?,
            None => Backend::default(),
        };

        // Presence was checked above.
        let required = |name: &str| get(name).unwrap_or_default();
        Ok(Self {
            host: required(HOST_VAR),
            port,
            user: required(USER_VAR),
            password: required(PASSWORD_VAR),
            database: required(NAME_VAR),
            backend,
        })
    }

    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Load `.env` from the working directory if there is one.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!("loaded environment from {}", path.display());
            Some(path)
        }
        Err(err) => {
            debug!("no .env loaded: {err}");
            None
        }
    }
}

/// Lines shown when configuration is incomplete.
pub fn usage_hint() -> [String; 3] {
    [
        format!(
            "Error: {} environment variables must be set.",
            REQUIRED_VARS.join(", ")
        ),
        format!("Example for Linux/macOS: export {HOST_VAR}='your-rds-instance.region.rds.amazonaws.com'"),
        format!("Example for Windows: set {HOST_VAR}=your-rds-instance.region.rds.amazonaws.com"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            (HOST_VAR, "db.example.internal"),
            (USER_VAR, "admin"),
            (PASSWORD_VAR, "hunter2"),
            (NAME_VAR, "poc"),
        ]
    }

    #[test]
    fn loads_required_values_with_defaults() {
        let config = DbConfig::from_lookup(lookup(&complete())).unwrap();
        assert_eq!(config.host, "db.example.internal");
        assert_eq!(config.user, "admin");
        assert_eq!(config.password, "hunter2");
        assert_eq!(config.database, "poc");
        assert_eq!(config.port, DEFAULT_MYSQL_PORT);
        assert_eq!(config.backend, Backend::MySql);
    }

    #[test]
    fn each_missing_value_is_reported() {
        for skip in REQUIRED_VARS {
            let pairs: Vec<_> = complete().into_iter().filter(|(k, _)| *k != skip).collect();
            let err = DbConfig::from_lookup(lookup(&pairs)).unwrap_err();
            assert_eq!(err, ConfigError::Missing(vec![skip]));
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut pairs = complete();
        pairs[2] = (PASSWORD_VAR, "");
        let err = DbConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(err.missing(), [PASSWORD_VAR]);
    }

    #[test]
    fn nothing_set_reports_all_four() {
        let err = DbConfig::from_lookup(|_| None).unwrap_err();
        assert_eq!(err.missing(), REQUIRED_VARS);
    }

    #[test]
    fn optional_port_and_backend() {
        let mut pairs = complete();
        pairs.push((PORT_VAR, "3307"));
        pairs.push((BACKEND_VAR, "SQLite"));
        let config = DbConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.port, 3307);
        assert_eq!(config.backend, Backend::Sqlite);
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut pairs = complete();
        pairs.push((PORT_VAR, "not-a-port"));
        let err = DbConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: PORT_VAR, .. }));
    }

    #[test]
    fn debug_hides_password() {
        let config = DbConfig::from_lookup(lookup(&complete())).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
