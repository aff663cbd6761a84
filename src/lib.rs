//! End-to-end CRUD proof of concept for a managed MySQL instance.
//!
//! # Intention
//!
//! - Show the smallest complete round trip against a remote database: connect,
//!   recreate one table, insert a few rows, read them back, close.
//! - Keep every database call behind one seam ([`store::ConsultantStore`]) so the
//!   same run can target MySQL or a local SQLite file.
//!
//! # Architectural Boundaries
//!
//! - Only connection, schema and CRUD code belongs here.
//! - No pooling, no migrations, no retries.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod mysql;
pub mod runner;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use config::{Backend, DbConfig};
pub use error::{ConfigError, StoreError};
pub use model::{Consultant, NewConsultant};
pub use runner::{run, RunReport};
pub use store::{ConnectionState, ConsultantStore, Connector};
