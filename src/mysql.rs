//! MySQL backend over sqlx.
//!
//! Connects straight into the configured database, which must already exist on
//! the server. Each insert runs in its own transaction and is committed before
//! returning.

use async_trait::async_trait;
use log::{debug, info, trace};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Connection, Row};

use crate::config::DbConfig;
use crate::error::{DriverError, Result, StoreError};
use crate::model::{Consultant, Inserted, NewConsultant};
use crate::schema::{self, Dialect, CONSULTANTS_TABLE};
use crate::store::{ConnectionState, ConsultantStore, Connector, Slot};

pub struct MySqlStore {
    database: String,
    slot: Slot<MySqlConnection>,
}

impl MySqlStore {
    pub fn connect_options(config: &DbConfig) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
    }

    pub async fn open(config: &DbConfig) -> Result<Self> {
        debug!(
            "connecting to mysql://{}@{}:{}/{}",
            config.user, config.host, config.port, config.database
        );
        let conn = MySqlConnection::connect_with(&Self::connect_options(config))
            .await
            .map_err(|e| StoreError::Connect {
                database: config.database.clone(),
                source: e.into(),
            })?;
        Ok(Self {
            database: config.database.clone(),
            slot: Slot::open(conn),
        })
    }

    fn conn(&mut self) -> std::result::Result<&mut MySqlConnection, DriverError> {
        self.slot.get_mut()
    }
}

fn schema_err(source: impl Into<DriverError>) -> StoreError {
    StoreError::Schema {
        table: CONSULTANTS_TABLE,
        source: source.into(),
    }
}

fn map_row(row: &MySqlRow) -> std::result::Result<Consultant, sqlx::Error> {
    Ok(Consultant {
        id: i64::from(row.try_get::<i32, _>("id")?),
        name: row.try_get("name")?,
        specialty: row.try_get("specialty")?,
    })
}

#[async_trait]
impl ConsultantStore for MySqlStore {
    fn database(&self) -> &str {
        &self.database
    }

    fn backend(&self) -> &'static str {
        "MySQL"
    }

    fn state(&self) -> ConnectionState {
        self.slot.state()
    }

    async fn recreate_table(&mut self) -> Result<()> {
        let table = schema::consultants_table();
        let database = self.database.clone();
        let conn = self.conn().map_err(schema_err)?;

        let drop_sql = table.drop_sql();
        trace!("{drop_sql}");
        sqlx::query(&drop_sql).execute(&mut *conn).await.map_err(schema_err)?;
        info!("Table '{}' dropped if it existed in database '{}'.", table.name, database);

        let create = table.create_sql(Dialect::MySql);
        trace!("{create}");
        sqlx::query(&create).execute(&mut *conn).await.map_err(schema_err)?;
        info!("Table '{}' created in database '{}'.", table.name, database);
        Ok(())
    }

    async fn insert(&mut self, consultant: &NewConsultant) -> Result<Inserted> {
        let conn = self.conn().map_err(StoreError::Insert)?;
        let insert_err = |e: sqlx::Error| StoreError::Insert(e.into());

        let mut tx = conn.begin().await.map_err(insert_err)?;
        let done = sqlx::query(schema::INSERT_CONSULTANT)
            .bind(&consultant.name)
            .bind(consultant.specialty.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(insert_err)?;
        tx.commit().await.map_err(insert_err)?;

        Ok(Inserted {
            id: done.last_insert_id() as i64,
            rows_affected: done.rows_affected(),
        })
    }

    async fn fetch_all(&mut self) -> Result<Vec<Consultant>> {
        let conn = self.conn().map_err(StoreError::Read)?;
        let rows = sqlx::query(schema::SELECT_CONSULTANTS)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| StoreError::Read(e.into()))?;
        rows.iter()
            .map(|row| map_row(row).map_err(|e| StoreError::Read(e.into())))
            .collect()
    }

    async fn close(&mut self) -> Result<bool> {
        match self.slot.take() {
            Some(conn) => {
                conn.close().await.map_err(|e| StoreError::Close(e.into()))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Opens [`MySqlStore`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlConnector;

#[async_trait]
impl Connector for MySqlConnector {
    async fn connect(&self, config: &DbConfig) -> Result<Box<dyn ConsultantStore>> {
        Ok(Box::new(MySqlStore::open(config).await?))
    }
}
