//! Database Engine Traits and Core Types
//!
//! This module defines the seam between the dispatchers and the relational
//! engine: a data source definition, the [`ConnectionProvider`] trait, bound
//! statement parameters and the normalized [`ResultSet`].
//!
//! # Stateless Design
//! Providers hold only the data source definition. A connection is opened per
//! dispatcher call and dropped before the call returns, on every path.

use std::fmt;
use std::path::PathBuf;

use rusqlite::types::ToSqlOutput;
use rusqlite::{Connection, ToSql};
use serde::{Deserialize, Serialize};

use crate::error::{RecordsError, Result};

pub mod sqlite;

/// Driver names accepted in a data source definition
pub const SQLITE_DRIVER: &str = "sqlite";

/// Data source definition loaded once at startup
///
/// `username` and `password` default to empty strings when absent.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// Driver name (only `sqlite` is supported); `None` means `sqlite`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,

    /// Database URL: a path, `sqlite:<path>`, `sqlite://<path>` or `jdbc:sqlite:<path>`
    pub url: String,

    #[serde(default)]
    pub username: String,

    /// WARNING: Sensitive data, do not log or include in error messages
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,

    /// Environment variable holding the password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
}

impl DataSourceConfig {
    /// Create a data source for an `SQLite` database file
    #[must_use]
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            driver: Some(SQLITE_DRIVER.to_string()),
            url: path.into().to_string_lossy().into_owned(),
            username: String::new(),
            password: String::new(),
            password_env: None,
        }
    }

    /// Resolve `password_env` into `password`
    pub fn resolve(&self) -> Result<Self> {
        let mut resolved = self.clone();

        if let Some(env_var) = &self.password_env {
            match std::env::var(env_var) {
                Ok(password) => resolved.password = password,
                Err(_) => {
                    return Err(RecordsError::config_error(format!(
                        "Environment variable {env_var} not found for password"
                    )));
                }
            }
        }

        Ok(resolved)
    }

    /// Driver name, defaulting to `sqlite`
    #[must_use]
    pub fn driver(&self) -> &str {
        self.driver.as_deref().unwrap_or(SQLITE_DRIVER)
    }

    /// Database file path encoded in the URL
    pub fn sqlite_path(&self) -> Result<PathBuf> {
        let url = self.url.trim();
        let path = ["jdbc:sqlite:", "sqlite://", "sqlite:"]
            .iter()
            .find_map(|prefix| url.strip_prefix(prefix))
            .unwrap_or(url);

        if path.is_empty() {
            return Err(RecordsError::config_error("Data source URL does not name a database"));
        }

        Ok(PathBuf::from(path))
    }
}

impl fmt::Debug for DataSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceConfig")
            .field("driver", &self.driver)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("password_env", &self.password_env)
            .finish()
    }
}

/// Source of live connections, opened per operation
pub trait ConnectionProvider {
    /// Open a new connection. The caller owns it and drops it when done.
    fn connect(&self) -> Result<Connection>;
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for &P {
    fn connect(&self) -> Result<Connection> {
        (**self).connect()
    }
}

/// Statement parameter, bound positionally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Text(String),
    Integer(i64),
}

impl ToSql for Param {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Self::Text(s) => s.to_sql(),
            Self::Integer(i) => i.to_sql(),
        }
    }
}

/// A single normalized result value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// Normalized query result: column labels plus rows of typed cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by label
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, in row order
    #[must_use]
    pub fn column_values(&self, name: &str) -> Vec<&Cell> {
        self.column_index(name)
            .map(|idx| self.rows.iter().filter_map(|row| row.get(idx)).collect())
            .unwrap_or_default()
    }
}

/// Connection information returned by the connectivity check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Database engine version string
    pub database_version: String,

    /// Name of the connected database
    pub connected_database: String,

    /// Records tables found in the database
    pub tables_present: Vec<String>,

    /// Records tables not found in the database
    pub tables_missing: Vec<String>,
}
