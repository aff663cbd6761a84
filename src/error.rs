use thiserror::Error;

/// Problems found while reading configuration, before any network activity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl ConfigError {
    /// Names of the missing variables, empty for other kinds.
    pub fn missing(&self) -> &[&'static str] {
        match self {
            ConfigError::Missing(names) => names,
            ConfigError::Invalid { .. } => &[],
        }
    }
}

/// Driver-level failure, whichever backend produced it.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    MySql(#[from] sqlx::Error),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("connection is {0}")]
    NotOpen(&'static str),
}

/// Database errors, tagged by the step that raised them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to connect to database {database:?}: {source}")]
    Connect {
        database: String,
        #[source]
        source: DriverError,
    },
    #[error("error recreating table '{table}': {source}")]
    Schema {
        table: &'static str,
        #[source]
        source: DriverError,
    },
    #[error("error inserting data: {0}")]
    Insert(#[source] DriverError),
    #[error("error reading data: {0}")]
    Read(#[source] DriverError),
    #[error("error closing connection: {0}")]
    Close(#[source] DriverError),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lists_every_variable() {
        let err = ConfigError::Missing(vec!["DB_HOST_POC", "DB_NAME_POC"]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: DB_HOST_POC, DB_NAME_POC"
        );
        assert_eq!(err.missing(), ["DB_HOST_POC", "DB_NAME_POC"]);
    }

    #[test]
    fn store_error_carries_driver_message() {
        let err = StoreError::Insert(DriverError::NotOpen("closed"));
        assert_eq!(err.to_string(), "error inserting data: connection is closed");
    }
}
