use async_trait::async_trait;

use crate::config::DbConfig;
use crate::error::{DriverError, Result};
use crate::model::{Consultant, Inserted, NewConsultant};

/// Lifecycle of the single connection a run holds. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unopened,
    Open,
    Closed,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Unopened => "unopened",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        }
    }
}

/// Holds a driver connection and tracks its state.
///
/// Backends keep their connection in here so `close` can only ever happen once.
#[derive(Debug)]
pub struct Slot<C> {
    conn: Option<C>,
    state: ConnectionState,
}

impl<C> Default for Slot<C> {
    fn default() -> Self {
        Self {
            conn: None,
            state: ConnectionState::Unopened,
        }
    }
}

impl<C> Slot<C> {
    pub fn open(conn: C) -> Self {
        Self {
            conn: Some(conn),
            state: ConnectionState::Open,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn get_mut(&mut self) -> std::result::Result<&mut C, DriverError> {
        let state = self.state;
        self.conn.as_mut().ok_or(DriverError::NotOpen(state.as_str()))
    }

    /// Take the connection out for closing; `None` unless currently open.
    pub fn take(&mut self) -> Option<C> {
        let conn = self.conn.take()?;
        self.state = ConnectionState::Closed;
        Some(conn)
    }
}

/// One open connection to the consultant table.
#[async_trait]
pub trait ConsultantStore: Send {
    /// Name of the database this store is bound to.
    fn database(&self) -> &str;

    /// Backend label used in log lines.
    fn backend(&self) -> &'static str;

    fn state(&self) -> ConnectionState;

    /// Drop `tech_consultants` if present, then create it empty.
    async fn recreate_table(&mut self) -> Result<()>;

    /// Insert one row with bound parameters and commit it.
    async fn insert(&mut self, consultant: &NewConsultant) -> Result<Inserted>;

    /// Every row, in id order.
    async fn fetch_all(&mut self) -> Result<Vec<Consultant>>;

    /// Release the connection. Returns `false` when it was not open.
    async fn close(&mut self) -> Result<bool>;
}

/// Opens a store for a configuration.
#[async_trait]
pub trait Connector: Sync {
    async fn connect(&self, config: &DbConfig) -> Result<Box<dyn ConsultantStore>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_closes_once() {
        let mut slot = Slot::open(42u8);
        assert_eq!(slot.state(), ConnectionState::Open);
        assert_eq!(*slot.get_mut().unwrap(), 42);

        assert_eq!(slot.take(), Some(42));
        assert_eq!(slot.state(), ConnectionState::Closed);
        assert_eq!(slot.take(), None);
        assert!(matches!(slot.get_mut(), Err(DriverError::NotOpen("closed"))));
    }

    #[test]
    fn default_slot_is_unopened() {
        let mut slot: Slot<u8> = Slot::default();
        assert_eq!(slot.state(), ConnectionState::Unopened);
        assert_eq!(slot.take(), None);
        assert_eq!(slot.state(), ConnectionState::Unopened);
    }
}
