//! Query Dispatcher
//!
//! Maps a closed vocabulary of `{action, table, parameters}` triples onto
//! parameterized SQL statements, executes them and normalizes the result into
//! an [`Outcome`].
//!
//! # Statement Shapes
//! - `Create`: `INSERT INTO <table> (<columns>) VALUES (?1, ...)`
//! - `Read`: `SELECT * FROM <table>`
//! - `Update`: `UPDATE <table> SET <column> = ?1 WHERE <identity> = ?2`
//! - `Delete`: `DELETE FROM <target> WHERE <identity> = ?1`
//!
//! Join tables have no identity column. `Update` keeps the join table but
//! filters on the redirect target's identity column; `Delete` targets the
//! redirect table itself (`registered` → `student`, `teaches` → `staff`).
//!
//! # Failure Handling
//! Validation runs before a connection is opened. Engine failures and empty
//! reads are converted into unsuccessful outcomes; nothing escapes
//! [`Dispatcher::execute`].

use tracing::{debug, info};

use crate::engine::sqlite::{execute_statement, query_rows, SqliteProvider};
use crate::engine::{ConnectionProvider, Param};
use crate::error::{RecordsError, Result};
use crate::output::Outcome;
use crate::report::Report;
use crate::schema::{Action, Column, ColumnKind, Table};

/// Validation message for short parameter lists
pub const TOO_FEW_PARAMETERS: &str = "Too Few Parameters";

/// Validation message for long parameter lists
pub const TOO_MANY_PARAMETERS: &str = "Too Many Parameters";

/// Column whose update value is bound as an integer
const NUMERIC_UPDATE_COLUMN: &str = "credits";

/// Whether a statement returns rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Execute,
    Query,
}

/// A fully built, parameterized statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Param>,
    pub kind: StatementKind,
}

impl Statement {
    fn execute(sql: String, params: Vec<Param>) -> Self {
        Self { sql, params, kind: StatementKind::Execute }
    }

    pub(crate) fn query(sql: String, params: Vec<Param>) -> Self {
        Self { sql, params, kind: StatementKind::Query }
    }
}

/// Build the statement for an action, validating the parameter list
pub fn build_statement(action: Action, table: Table, params: &[String]) -> Result<Statement> {
    match action {
        Action::Create => build_create(table, params),
        Action::Read => Ok(Statement::query(format!("SELECT * FROM {table}"), Vec::new())),
        Action::Update => build_update(table, params),
        Action::Delete => build_delete(table, params),
    }
}

fn build_create(table: Table, params: &[String]) -> Result<Statement> {
    let columns = table.columns();
    check_arity(params, columns.len())?;

    let bound = columns
        .iter()
        .zip(params)
        .map(|(column, value)| bind_column(column, value))
        .collect::<Result<Vec<_>>>()?;

    let names: Vec<&str> = columns.iter().map(|c| c.name).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();

    Ok(Statement::execute(
        format!("INSERT INTO {table} ({}) VALUES ({})", names.join(", "), placeholders.join(", ")),
        bound,
    ))
}

fn build_update(table: Table, params: &[String]) -> Result<Statement> {
    let [id, column, value, ..] = params else {
        return Err(RecordsError::validation(TOO_FEW_PARAMETERS));
    };

    let bound_value = if column == NUMERIC_UPDATE_COLUMN {
        Param::Integer(parse_integer(column, value)?)
    } else {
        Param::Text(value.clone())
    };

    Ok(Statement::execute(
        format!(
            "UPDATE {table} SET {} = ?1 WHERE {} = ?2",
            quote_identifier(column),
            table.identity_column()
        ),
        vec![bound_value, Param::Text(id.clone())],
    ))
}

fn build_delete(table: Table, params: &[String]) -> Result<Statement> {
    let Some(id) = params.first() else {
        return Err(RecordsError::validation(TOO_FEW_PARAMETERS));
    };

    let target = table.delete_target();
    Ok(Statement::execute(
        format!("DELETE FROM {target} WHERE {} = ?1", target.identity_column()),
        vec![Param::Text(id.clone())],
    ))
}

fn check_arity(params: &[String], expected: usize) -> Result<()> {
    match params.len().cmp(&expected) {
        std::cmp::Ordering::Less => Err(RecordsError::validation(TOO_FEW_PARAMETERS)),
        std::cmp::Ordering::Greater => Err(RecordsError::validation(TOO_MANY_PARAMETERS)),
        std::cmp::Ordering::Equal => Ok(()),
    }
}

fn bind_column(column: &Column, value: &str) -> Result<Param> {
    Ok(match column.kind {
        ColumnKind::Text => Param::Text(value.to_string()),
        ColumnKind::Integer => Param::Integer(parse_integer(column.name, value)?),
    })
}

fn parse_integer(column: &str, value: &str) -> Result<i64> {
    value.parse::<i64>().map_err(|_| {
        RecordsError::validation(format!("Invalid integer for {column}: '{value}'"))
    })
}

/// Quote a user-supplied column name as an SQL identifier
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Run one statement on an open connection
///
/// Queries that match no rows fail with [`RecordsError::EmptyResult`].
pub(crate) fn run_statement(conn: &rusqlite::Connection, stmt: &Statement) -> Result<Outcome> {
    match stmt.kind {
        StatementKind::Execute => {
            execute_statement(conn, &stmt.sql, &stmt.params)?;
            Ok(Outcome::written())
        }
        StatementKind::Query => {
            let rows = query_rows(conn, &stmt.sql, &stmt.params)?;
            if rows.is_empty() {
                return Err(RecordsError::EmptyResult);
            }
            Ok(Outcome::rows(rows))
        }
    }
}

/// Operations the session can request from the records store
pub trait RecordStore {
    /// Run a CRUD action against a table
    fn execute(&self, action: Action, table: Table, params: &[String]) -> Outcome;

    /// Run one of the fixed reports
    fn report(&self, report: Report, input: Option<&str>) -> Outcome;
}

/// Query and report dispatcher over a connection provider
#[derive(Debug, Clone)]
pub struct Dispatcher<P = SqliteProvider> {
    provider: P,
}

impl<P: ConnectionProvider> Dispatcher<P> {
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Run a CRUD action. Never fails; errors become unsuccessful outcomes.
    pub fn execute(&self, action: Action, table: Table, params: &[String]) -> Outcome {
        debug!(?action, %table, params = params.len(), "dispatching query");

        match build_statement(action, table, params) {
            Ok(stmt) => self.run(&stmt),
            Err(err) => {
                info!(?action, %table, error = %err, "rejected before execution");
                Outcome::from_error(&err)
            }
        }
    }

    /// Open a connection, run the statement, and drop the connection
    pub(crate) fn run(&self, stmt: &Statement) -> Outcome {
        let result = self.provider.connect().and_then(|conn| run_statement(&conn, stmt));

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                if !matches!(err, RecordsError::EmptyResult) {
                    info!(error = %err, "statement failed");
                }
                Outcome::from_error(&err)
            }
        }
    }
}

impl<P: ConnectionProvider> RecordStore for Dispatcher<P> {
    fn execute(&self, action: Action, table: Table, params: &[String]) -> Outcome {
        Dispatcher::execute(self, action, table, params)
    }

    fn report(&self, report: Report, input: Option<&str>) -> Outcome {
        Dispatcher::report(self, report, input)
    }
}
