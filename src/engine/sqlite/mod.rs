//! `SQLite` Connection Provider
//!
//! # Features
//! - File-based connections (`/path/to/records.db`)
//! - Parameterized statement execution with positional binding
//! - Row normalization into typed [`Cell`]s
//! - Connectivity check with records table presence
//!
//! # Implementation Notes
//! - Uses `rusqlite` (synchronous driver, no async needed)
//! - Connections and prepared statements are dropped on every exit path
//! - Write connections never create the database file

use std::path::PathBuf;

use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OpenFlags, Row};
use tracing::{debug, info};

use crate::engine::{
    Cell, ConnectionInfo, ConnectionProvider, DataSourceConfig, Param, ResultSet, SQLITE_DRIVER,
};
use crate::error::{RecordsError, Result};
use crate::schema::Table;

/// `SQLite` connection provider
#[derive(Debug, Clone)]
pub struct SqliteProvider {
    path: PathBuf,
}

impl SqliteProvider {
    /// Build a provider from a data source definition
    ///
    /// Fails with a configuration error for any driver other than `sqlite`.
    pub fn new(config: &DataSourceConfig) -> Result<Self> {
        if config.driver() != SQLITE_DRIVER {
            return Err(RecordsError::config_error(format!(
                "Unsupported driver '{}', expected '{SQLITE_DRIVER}'",
                config.driver()
            )));
        }

        let config = config.resolve()?;
        if !config.username.is_empty() || !config.password.is_empty() {
            debug!("SQLite ignores username/password credentials");
        }

        let path = config.sqlite_path()?;
        info!(database = %path.display(), "using SQLite data source");
        Ok(Self { path })
    }

    /// Open a read-only connection, used by the connectivity check
    pub fn connect_read_only(&self) -> Result<Connection> {
        open_connection(&self.path, true)
    }
}

impl ConnectionProvider for SqliteProvider {
    fn connect(&self) -> Result<Connection> {
        open_connection(&self.path, false)
    }
}

/// Open `SQLite` connection with appropriate flags
fn open_connection(path: &std::path::Path, read_only: bool) -> Result<Connection> {
    let flags = if read_only {
        OpenFlags::SQLITE_OPEN_READ_ONLY
    } else {
        OpenFlags::SQLITE_OPEN_READ_WRITE
    };

    Connection::open_with_flags(path, flags).map_err(|e| {
        RecordsError::connection_failed(format!(
            "Failed to open SQLite database {}: {e}",
            path.display()
        ))
    })
}

/// Execute a non-query statement, returning the number of changed rows
pub fn execute_statement(conn: &Connection, sql: &str, params: &[Param]) -> Result<usize> {
    debug!(sql, params = params.len(), "executing statement");

    let mut stmt = conn.prepare(sql)?;
    let changed = stmt.execute(params_from_iter(params.iter()))?;

    debug!(changed, "statement complete");
    Ok(changed)
}

/// Execute a query and normalize every row into typed cells
pub fn query_rows(conn: &Connection, sql: &str, params: &[Param]) -> Result<ResultSet> {
    debug!(sql, params = params.len(), "executing query");

    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|s| (*s).to_string()).collect();
    let width = columns.len();

    let rows = stmt
        .query(params_from_iter(params.iter()))?
        .mapped(|row| row_to_cells(width, row))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!(rows = rows.len(), "query complete");
    Ok(ResultSet { columns, rows })
}

/// Validate connectivity and report which records tables exist
pub fn validate_connection(provider: &SqliteProvider) -> Result<ConnectionInfo> {
    let conn = provider.connect_read_only()?;

    let version: String = conn
        .query_row("SELECT sqlite_version()", [], |row| row.get(0))
        .map_err(|e| {
            RecordsError::connection_failed(format!("Failed to query SQLite version: {e}"))
        })?;

    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table'
         AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;
    let existing: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;

    let (tables_present, tables_missing): (Vec<_>, Vec<_>) = Table::ALL
        .iter()
        .map(|t| t.name().to_string())
        .partition(|name| existing.iter().any(|e| e.eq_ignore_ascii_case(name)));

    let connected_database = provider
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_else(|| provider.path.to_str().unwrap_or("unknown"))
        .to_string();

    Ok(ConnectionInfo { database_version: version, connected_database, tables_present, tables_missing })
}

fn row_to_cells(width: usize, row: &Row) -> rusqlite::Result<Vec<Cell>> {
    (0..width).map(|idx| row.get_ref(idx).map(cell_from_value)).collect()
}

/// Convert `SQLite` value to a normalized cell
fn cell_from_value(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(i) => Cell::Integer(i),
        ValueRef::Real(f) => Cell::Real(f),
        ValueRef::Text(s) => Cell::Text(String::from_utf8_lossy(s).into_owned()),
        ValueRef::Blob(b) => Cell::Blob(b.to_vec()),
    }
}
