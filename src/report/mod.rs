//! Report Dispatcher
//!
//! Four fixed, read-only cross-table reports. Each [`Report`] is bound to one
//! parameterized SELECT and an arity of 0 or 1 input parameters. Reports share
//! the read path of the query dispatcher, including the "No Data" outcome for
//! empty results.

use tracing::debug;

use crate::engine::{ConnectionProvider, Param};
use crate::error::{RecordsError, Result};
use crate::output::Outcome;
use crate::query::{Dispatcher, Statement, TOO_FEW_PARAMETERS};

/// The fixed reports, in report menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Report {
    /// Modules taught by a staff member (input: staff id)
    ModulesTaughtBy,
    /// Students registered on a module (input: module id)
    StudentsOfModule,
    /// Staff teaching any module a student is registered on (input: student id)
    StaffTeachingStudent,
    /// Staff teaching more than one module
    StaffTeachingMultiple,
}

impl Report {
    pub const ALL: [Self; 4] = [
        Self::ModulesTaughtBy,
        Self::StudentsOfModule,
        Self::StaffTeachingStudent,
        Self::StaffTeachingMultiple,
    ];

    /// Statement text
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::ModulesTaughtBy => {
                "SELECT module.module_id, module.module_name \
                 FROM teaches INNER JOIN module ON teaches.module_id = module.module_id \
                 WHERE teaches.staff_id = ?1"
            }
            Self::StudentsOfModule => {
                "SELECT student.student_id, student.student_name \
                 FROM registered INNER JOIN student ON registered.student_id = student.student_id \
                 WHERE registered.module_id = ?1"
            }
            Self::StaffTeachingStudent => {
                "SELECT DISTINCT staff.staff_id, staff.staff_name \
                 FROM staff INNER JOIN teaches ON staff.staff_id = teaches.staff_id \
                 WHERE teaches.module_id IN \
                 (SELECT registered.module_id FROM registered WHERE registered.student_id = ?1)"
            }
            Self::StaffTeachingMultiple => {
                "SELECT DISTINCT staff.staff_id, staff.staff_name \
                 FROM staff INNER JOIN teaches ON staff.staff_id = teaches.staff_id \
                 GROUP BY staff.staff_id, staff.staff_name \
                 HAVING COUNT(teaches.module_id) > 1"
            }
        }
    }

    /// Number of input parameters the report takes
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::StaffTeachingMultiple => 0,
            Self::ModulesTaughtBy | Self::StudentsOfModule | Self::StaffTeachingStudent => 1,
        }
    }

    /// Report menu label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ModulesTaughtBy => "Modules taught by",
            Self::StudentsOfModule => "Students registered on",
            Self::StaffTeachingStudent => "Staff who teach student",
            Self::StaffTeachingMultiple => "Staff who teach more than one module",
        }
    }

    /// What the single input identifies, for prompting
    #[must_use]
    pub const fn input_label(self) -> Option<&'static str> {
        match self {
            Self::ModulesTaughtBy => Some("staff id"),
            Self::StudentsOfModule => Some("module id"),
            Self::StaffTeachingStudent => Some("student id"),
            Self::StaffTeachingMultiple => None,
        }
    }
}

/// Build the report statement, binding the input when the report takes one
///
/// Input supplied to a parameterless report is ignored.
pub fn build_report(report: Report, input: Option<&str>) -> Result<Statement> {
    let params = match (report.arity(), input) {
        (0, _) => Vec::new(),
        (_, Some(value)) => vec![Param::Text(value.to_string())],
        (_, None) => return Err(RecordsError::validation(TOO_FEW_PARAMETERS)),
    };

    Ok(Statement::query(report.sql().to_string(), params))
}

impl<P: ConnectionProvider> Dispatcher<P> {
    /// Run a fixed report. Never fails; errors become unsuccessful outcomes.
    pub fn report(&self, report: Report, input: Option<&str>) -> Outcome {
        debug!(?report, has_input = input.is_some(), "dispatching report");

        match build_report(report, input) {
            Ok(stmt) => self.run(&stmt),
            Err(err) => Outcome::from_error(&err),
        }
    }
}
