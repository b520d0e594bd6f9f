//! Records - University Records Administration
//!
//! An interactive administration tool for a small university records store:
//! students, modules, staff, course registrations and teaching assignments,
//! plus four fixed cross-table reports.
//!
//! # Architecture
//! - The query dispatcher maps `{action, table, parameters}` onto
//!   parameterized statements and normalizes results into an [`Outcome`].
//! - The report dispatcher runs one of four fixed, read-only reports.
//! - The session state machine drives the nested text menus and routes input
//!   into the dispatchers through the [`RecordStore`] trait.
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`schema`] - Table identities, columns and redirection rules
//! - [`engine`] - Connection provider trait, `SQLite` implementation, result types
//! - [`output`] - Outcome record and fixed-width rendering
//! - [`query`] - Query dispatcher
//! - [`report`] - Report dispatcher
//! - [`session`] - Session state machine
//! - [`config`] - Configuration management

pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod query;
pub mod report;
pub mod schema;
pub mod session;

// Re-export commonly used types for convenience
pub use config::{resolve_config, save_config, ConfigLocation, ConfigOverrides};
pub use engine::sqlite::SqliteProvider;
pub use engine::{Cell, ConnectionInfo, ConnectionProvider, DataSourceConfig, Param, ResultSet};
pub use error::{RecordsError, Result};
pub use output::Outcome;
pub use query::{Dispatcher, RecordStore};
pub use report::Report;
pub use schema::{Action, Table};
pub use session::{Session, State};
