//! Table Identities
//!
//! The records store has a fixed set of five tables. Each [`Table`] carries its
//! storage name, ordered columns and identity rule as data so that the
//! dispatcher never compares table names as strings.
//!
//! # Identity Rules
//! - Simple entities (`student`, `module`, `staff`) are targeted through their
//!   own `<table>_id` column.
//! - Join tables (`registered`, `teaches`) have no identity column of their
//!   own. Update and delete requests against them are redirected onto an
//!   entity table (`registered` → `student`, `teaches` → `staff`).

use std::fmt;

/// CRUD actions the query dispatcher accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
}

/// A column in a records table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    const fn text(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Text }
    }

    const fn integer(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Integer }
    }
}

/// How update/delete requests locate a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// The table's own identity column
    Own(&'static str),
    /// Join table: target the given entity table's identity instead
    Redirect(Table),
}

/// The five tables of the records store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Student,
    Module,
    Staff,
    Registered,
    Teaches,
}

const STUDENT_COLUMNS: &[Column] =
    &[Column::text("student_id"), Column::text("student_name"), Column::text("degree_scheme")];
const MODULE_COLUMNS: &[Column] =
    &[Column::text("module_id"), Column::text("module_name"), Column::integer("credits")];
const STAFF_COLUMNS: &[Column] =
    &[Column::text("staff_id"), Column::text("staff_name"), Column::text("grade")];
const REGISTERED_COLUMNS: &[Column] = &[Column::text("student_id"), Column::text("module_id")];
const TEACHES_COLUMNS: &[Column] = &[Column::text("staff_id"), Column::text("module_id")];

impl Table {
    /// All tables, in main menu order
    pub const ALL: [Self; 5] =
        [Self::Student, Self::Module, Self::Staff, Self::Registered, Self::Teaches];

    /// Storage name of the table
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Module => "module",
            Self::Staff => "staff",
            Self::Registered => "registered",
            Self::Teaches => "teaches",
        }
    }

    /// Ordered column list, as bound by `Create`
    #[must_use]
    pub const fn columns(self) -> &'static [Column] {
        match self {
            Self::Student => STUDENT_COLUMNS,
            Self::Module => MODULE_COLUMNS,
            Self::Staff => STAFF_COLUMNS,
            Self::Registered => REGISTERED_COLUMNS,
            Self::Teaches => TEACHES_COLUMNS,
        }
    }

    #[must_use]
    pub const fn identity(self) -> Identity {
        match self {
            Self::Student => Identity::Own("student_id"),
            Self::Module => Identity::Own("module_id"),
            Self::Staff => Identity::Own("staff_id"),
            Self::Registered => Identity::Redirect(Self::Student),
            Self::Teaches => Identity::Redirect(Self::Staff),
        }
    }

    /// Whether this is a many-to-many join table
    #[must_use]
    pub const fn is_join(self) -> bool {
        matches!(self.identity(), Identity::Redirect(_))
    }

    /// Table that update/delete statements physically target
    ///
    /// Join tables resolve to their redirect target. This only applies
    /// to `Delete`; `Update` keeps the join table and borrows the target's
    /// identity column (see [`Table::identity_column`]).
    #[must_use]
    pub const fn delete_target(self) -> Self {
        match self.identity() {
            Identity::Own(_) => self,
            Identity::Redirect(target) => target,
        }
    }

    /// Identity column used in `WHERE` clauses of update/delete
    #[must_use]
    pub const fn identity_column(self) -> &'static str {
        match self.identity() {
            Identity::Own(column) => column,
            Identity::Redirect(target) => target.identity_column(),
        }
    }

    /// Menu label, singular
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Module => "Module",
            Self::Staff => "Staff",
            Self::Registered => "Registration",
            Self::Teaches => "Teaches",
        }
    }

    /// Menu label, plural
    #[must_use]
    pub const fn plural_label(self) -> &'static str {
        match self {
            Self::Student => "Students",
            Self::Module => "Modules",
            Self::Staff => "Staff",
            Self::Registered => "Registrations",
            Self::Teaches => "Teaches",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
