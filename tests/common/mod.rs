//! Shared helpers for integration tests

#![allow(dead_code)]

use std::cell::Cell as Counter;
use std::path::{Path, PathBuf};

use records::{ConnectionProvider, DataSourceConfig, Outcome, Result, SqliteProvider};
use rusqlite::Connection;

const SCHEMA: &str = "
    CREATE TABLE student (
        student_id TEXT PRIMARY KEY,
        student_name TEXT NOT NULL,
        degree_scheme TEXT
    );
    CREATE TABLE module (
        module_id TEXT PRIMARY KEY,
        module_name TEXT NOT NULL,
        credits INTEGER
    );
    CREATE TABLE staff (
        staff_id TEXT PRIMARY KEY,
        staff_name TEXT NOT NULL,
        grade TEXT
    );
    CREATE TABLE registered (
        student_id TEXT NOT NULL,
        module_id TEXT NOT NULL,
        PRIMARY KEY (student_id, module_id)
    );
    CREATE TABLE teaches (
        staff_id TEXT NOT NULL,
        module_id TEXT NOT NULL,
        PRIMARY KEY (staff_id, module_id)
    );
";

/// Unique temp file path that does not exist yet
pub fn unique_db_path(label: &str) -> PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let temp_file =
        std::env::temp_dir().join(format!("records_it_{label}_{}_{id}.db", std::process::id()));
    let _ = std::fs::remove_file(&temp_file);
    temp_file
}

/// Create an empty records database in a unique temp file
pub fn create_records_db() -> PathBuf {
    let temp_file = unique_db_path("db");

    let conn = Connection::open(&temp_file).expect("Failed to create temp database");
    conn.execute_batch(SCHEMA).expect("Failed to create schema");

    temp_file
}

/// Run setup SQL directly against the database
pub fn seed(path: &Path, sql: &str) {
    let conn = Connection::open(path).expect("Failed to open database");
    conn.execute_batch(sql).expect("Failed to seed database");
}

/// Count rows matching a WHERE clause
pub fn count(path: &Path, table: &str, filter: &str) -> i64 {
    let conn = Connection::open(path).expect("Failed to open database");
    conn.query_row(&format!("SELECT COUNT(*) FROM {table} WHERE {filter}"), [], |r| r.get(0))
        .expect("Failed to count rows")
}

pub fn cleanup(path: &Path) {
    let _ = std::fs::remove_file(path);
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

/// Text of one column across all result rows
pub fn column_text(outcome: &Outcome, column: &str) -> Vec<String> {
    outcome
        .result
        .as_ref()
        .map(|rs| rs.column_values(column).into_iter().map(records::output::cell_text).collect())
        .unwrap_or_default()
}

/// Provider that counts how many connections were opened
pub struct CountingProvider {
    inner: SqliteProvider,
    opened: Counter<usize>,
}

impl CountingProvider {
    pub fn new(path: &Path) -> Self {
        let inner =
            SqliteProvider::new(&DataSourceConfig::sqlite(path)).expect("Failed to build provider");
        Self { inner, opened: Counter::new(0) }
    }

    pub fn opened(&self) -> usize {
        self.opened.get()
    }
}

impl ConnectionProvider for CountingProvider {
    fn connect(&self) -> Result<Connection> {
        self.opened.set(self.opened.get() + 1);
        self.inner.connect()
    }
}
