//! The end-to-end run: connect, recreate the table, insert, read back, close.
//!
//! Failure policy:
//!
//! - connection failure ends the run; nothing is closed because nothing opened
//! - table recreation failure skips the remaining steps
//! - insert failures are logged and the next row is still attempted
//! - read failure is logged
//!
//! Whatever happens after the connection opens, it is closed exactly once.

use log::{error, info};

use crate::config::{Backend, DbConfig};
use crate::error::Result;
use crate::model::{Consultant, Inserted, NewConsultant};
use crate::mysql::MySqlConnector;
use crate::sqlite::SqliteConnector;
use crate::store::{ConsultantStore, Connector};

pub const EMPTY_TABLE_MESSAGE: &str = "No records found (as expected after table recreation).";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    pub consultant: NewConsultant,
    pub result: std::result::Result<Inserted, String>,
}

/// What a run did, step by step.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub connected: bool,
    pub table_ready: bool,
    pub inserts: Vec<InsertOutcome>,
    pub rows: Option<Vec<Consultant>>,
    pub closed: bool,
    /// Error that ended the run early, if any.
    pub error: Option<String>,
}

impl RunReport {
    pub fn inserted_ids(&self) -> Vec<i64> {
        self.inserts
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok().map(|done| done.id))
            .collect()
    }
}

pub fn connector_for(backend: Backend) -> &'static dyn Connector {
    match backend {
        Backend::MySql => &MySqlConnector,
        Backend::Sqlite => &SqliteConnector,
    }
}

/// Lines printed for a table listing.
pub fn listing_lines(rows: &[Consultant]) -> Vec<String> {
    let mut lines = vec!["--- Tech Consultants Data ---".to_string()];
    if rows.is_empty() {
        lines.push(EMPTY_TABLE_MESSAGE.to_string());
    } else {
        lines.extend(rows.iter().map(Consultant::to_string));
    }
    lines.push("-----------------------------".to_string());
    lines
}

pub async fn run(
    config: &DbConfig,
    connector: &dyn Connector,
    consultants: &[NewConsultant],
) -> RunReport {
    let mut report = RunReport::default();

    let mut store = match connector.connect(config).await {
        Ok(store) => store,
        Err(err) => {
            error!(
                "Error connecting to or working with {} database: {err}",
                config.backend.label()
            );
            report.error = Some(err.to_string());
            return report;
        }
    };
    report.connected = true;
    info!(
        "Successfully connected to {} database: {}!",
        store.backend(),
        store.database()
    );

    if let Err(err) = exercise(&mut *store, consultants, &mut report).await {
        error!("{err}");
        report.error = Some(err.to_string());
    }

    let backend = store.backend();
    match store.close().await {
        Ok(true) => {
            report.closed = true;
            info!("{backend} connection is closed.");
        }
        Ok(false) => {}
        Err(err) => error!("{err}"),
    }
    report
}

async fn exercise(
    store: &mut dyn ConsultantStore,
    consultants: &[NewConsultant],
    report: &mut RunReport,
) -> Result<()> {
    store.recreate_table().await?;
    report.table_ready = true;

    info!("--- Performing End-to-End Operations ---");
    info!("Inserting new data...");
    for consultant in consultants {
        let result = insert_one(store, consultant).await;
        report.inserts.push(InsertOutcome {
            consultant: consultant.clone(),
            result,
        });
    }

    report.rows = read_all(store).await;
    Ok(())
}

async fn insert_one(
    store: &mut dyn ConsultantStore,
    consultant: &NewConsultant,
) -> std::result::Result<Inserted, String> {
    match store.insert(consultant).await {
        Ok(done) => {
            info!(
                "Inserted: Name={}, Specialty={}. Rows affected: {}",
                consultant.name,
                consultant.specialty.as_deref().unwrap_or("None"),
                done.rows_affected
            );
            Ok(done)
        }
        Err(err) => {
            error!("{err}");
            Err(err.to_string())
        }
    }
}

async fn read_all(store: &mut dyn ConsultantStore) -> Option<Vec<Consultant>> {
    match store.fetch_all().await {
        Ok(rows) => {
            for line in listing_lines(&rows) {
                info!("{line}");
            }
            Some(rows)
        }
        Err(err) => {
            error!("{err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_listing_is_distinct() {
        let lines = listing_lines(&[]);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], EMPTY_TABLE_MESSAGE);
    }

    #[test]
    fn listing_prints_each_row() {
        let rows = vec![
            Consultant {
                id: 1,
                name: "Tony Stark".into(),
                specialty: Some("Advanced Engineering".into()),
            },
            Consultant {
                id: 2,
                name: "Nobody".into(),
                specialty: None,
            },
        ];
        let lines = listing_lines(&rows);
        assert_eq!(
            &lines[1..3],
            [
                "ID: 1, Name: Tony Stark, Specialty: Advanced Engineering",
                "ID: 2, Name: Nobody, Specialty: None",
            ]
        );
    }
}
