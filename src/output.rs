//! Outcome Record and Text Rendering
//!
//! Every dispatcher call returns an [`Outcome`]: a success flag, a status
//! message and, for read-like operations, the normalized [`ResultSet`].
//!
//! Presentation is a separate step. [`render_rows`] turns a result set into
//! fixed-width text lines:
//! - a header row of column labels,
//! - a separator row of `*`,
//! - one line per result row.
//!
//! Each cell is right-aligned in [`CELL_WIDTH`] characters and followed by a
//! single space. Longer values are not truncated.

use base64::Engine;

use crate::engine::{Cell, ResultSet};
use crate::error::RecordsError;

/// Width of a rendered cell
pub const CELL_WIDTH: usize = 30;

/// Status message for successful writes
pub const WRITE_SUCCESS: &str = "Update Successful";

/// Status message for successful reads
pub const READ_SUCCESS: &str = "Success";

/// Uniform result of a dispatcher call
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// True if the statement executed (and, for reads, matched rows)
    pub ok: bool,

    /// Human-readable status, or the failure message
    pub message: String,

    /// Stable error code for failures (see [`RecordsError::error_code`])
    pub code: Option<&'static str>,

    /// Result rows, present only for successful reads
    pub result: Option<ResultSet>,
}

impl Outcome {
    /// Successful write
    #[must_use]
    pub fn written() -> Self {
        Self { ok: true, message: WRITE_SUCCESS.to_string(), code: None, result: None }
    }

    /// Successful read carrying rows
    #[must_use]
    pub fn rows(result: ResultSet) -> Self {
        Self { ok: true, message: READ_SUCCESS.to_string(), code: None, result: Some(result) }
    }

    /// Unsuccessful outcome from a dispatcher error
    #[must_use]
    pub fn from_error(err: &RecordsError) -> Self {
        Self { ok: false, message: err.message(), code: Some(err.error_code()), result: None }
    }

    /// Whether this is the "No Data" outcome
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        self.code == Some("NO_DATA")
    }

    /// Render the result as fixed-width lines (empty when there is no result)
    #[must_use]
    pub fn rendered_rows(&self) -> Vec<String> {
        self.result.as_ref().map(render_rows).unwrap_or_default()
    }
}

/// Render a single cell value as text
#[must_use]
pub fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Null => "null".to_string(),
        Cell::Integer(i) => i.to_string(),
        Cell::Real(f) => f.to_string(),
        Cell::Text(s) => s.clone(),
        Cell::Blob(b) => base64::engine::general_purpose::STANDARD.encode(b),
    }
}

fn pad(text: &str) -> String {
    format!("{text:>width$} ", width = CELL_WIDTH)
}

/// Render a result set as header, separator and data lines
#[must_use]
pub fn render_rows(result: &ResultSet) -> Vec<String> {
    let mut lines: Vec<String> = Vec::with_capacity(result.rows.len() + 2);

    lines.push(result.columns.iter().map(|c| pad(c)).collect());
    lines.push(result.columns.iter().map(|_| pad(&"*".repeat(CELL_WIDTH))).collect());

    for row in &result.rows {
        lines.push(row.iter().map(|cell| pad(&cell_text(cell))).collect());
    }

    lines
}
