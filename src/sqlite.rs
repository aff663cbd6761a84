//! SQLite backend over rusqlite, for local runs against a file or `:memory:`.
//!
//! Host, user and password are accepted but unused; the database name is the
//! path of the database file.

use async_trait::async_trait;
use log::{debug, info, trace};
use rusqlite::{params, Connection};

use crate::config::DbConfig;
use crate::error::{DriverError, Result, StoreError};
use crate::model::{Consultant, Inserted, NewConsultant};
use crate::schema::{self, Dialect, CONSULTANTS_TABLE};
use crate::store::{ConnectionState, ConsultantStore, Connector, Slot};

pub struct SqliteStore {
    db_path: String,
    slot: Slot<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file at `db_path`.
    pub fn open(db_path: impl Into<String>) -> Result<Self> {
        let db_path = db_path.into();
        debug!("opening sqlite database at path: {db_path}");
        let conn = Connection::open(&db_path).map_err(|e| StoreError::Connect {
            database: db_path.clone(),
            source: e.into(),
        })?;
        Ok(Self {
            db_path,
            slot: Slot::open(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    fn conn(&mut self) -> std::result::Result<&mut Connection, DriverError> {
        self.slot.get_mut()
    }
}

fn schema_err(source: impl Into<DriverError>) -> StoreError {
    StoreError::Schema {
        table: CONSULTANTS_TABLE,
        source: source.into(),
    }
}

#[async_trait]
impl ConsultantStore for SqliteStore {
    fn database(&self) -> &str {
        &self.db_path
    }

    fn backend(&self) -> &'static str {
        "SQLite"
    }

    fn state(&self) -> ConnectionState {
        self.slot.state()
    }

    async fn recreate_table(&mut self) -> Result<()> {
        let table = schema::consultants_table();
        let db_path = self.db_path.clone();
        let conn = self.conn().map_err(schema_err)?;

        let drop_sql = table.drop_sql();
        trace!("{drop_sql}");
        conn.execute(&drop_sql, params![]).map_err(schema_err)?;
        info!("Table '{}' dropped if it existed in database '{}'.", table.name, db_path);

        let create = table.create_sql(Dialect::Sqlite);
        trace!("{create}");
        conn.execute(&create, params![]).map_err(schema_err)?;
        info!("Table '{}' created in database '{}'.", table.name, db_path);
        Ok(())
    }

    async fn insert(&mut self, consultant: &NewConsultant) -> Result<Inserted> {
        let conn = self.conn().map_err(StoreError::Insert)?;
        let insert_err = |e: rusqlite::Error| StoreError::Insert(e.into());

        let tx = conn.transaction().map_err(insert_err)?;
        let rows_affected = tx
            .execute(
                schema::INSERT_CONSULTANT,
                params![consultant.name, consultant.specialty],
            )
            .map_err(insert_err)?;
        let id = tx.last_insert_rowid();
        tx.commit().map_err(insert_err)?;

        Ok(Inserted {
            id,
            rows_affected: rows_affected as u64,
        })
    }

    async fn fetch_all(&mut self) -> Result<Vec<Consultant>> {
        let conn = self.conn().map_err(StoreError::Read)?;
        let read_err = |e: rusqlite::Error| StoreError::Read(e.into());

        let mut stmt = conn.prepare(schema::SELECT_CONSULTANTS).map_err(read_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Consultant {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    specialty: row.get(2)?,
                })
            })
            .map_err(read_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(read_err)
    }

    async fn close(&mut self) -> Result<bool> {
        match self.slot.take() {
            Some(conn) => {
                conn.close().map_err(|(_, e)| StoreError::Close(e.into()))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Opens [`SqliteStore`]s at the configured database path.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteConnector;

#[async_trait]
impl Connector for SqliteConnector {
    async fn connect(&self, config: &DbConfig) -> Result<Box<dyn ConsultantStore>> {
        Ok(Box::new(SqliteStore::open(config.database.clone())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_returns_engine_assigned_ids() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.recreate_table().await.unwrap();

        let first = store
            .insert(&NewConsultant::new("Carol Danvers", Some("Python & RDS Free Tier")))
            .await
            .unwrap();
        let second = store.insert(&NewConsultant::new("Nobody", None)).await.unwrap();

        assert_eq!(first.rows_affected, 1);
        assert!(first.id > 0);
        assert!(second.id > first.id);

        let rows = store.fetch_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].specialty, None);
    }

    #[tokio::test]
    async fn missing_name_is_rejected() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.recreate_table().await.unwrap();
        let conn = store.conn().unwrap();
        let err = conn
            .execute(
                "INSERT INTO tech_consultants (name, specialty) VALUES (NULL, 'x')",
                [],
            )
            .unwrap_err();
        assert!(err.to_string().contains("NOT NULL"));
    }

    #[tokio::test]
    async fn operations_after_close_fail() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(store.close().await.unwrap());
        assert!(!store.close().await.unwrap());
        assert_eq!(store.state(), ConnectionState::Closed);

        let err = store.fetch_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Read(DriverError::NotOpen("closed"))));
    }
}
