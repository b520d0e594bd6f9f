//! Session State Machine
//!
//! Drives the nested text menus, collects console input and routes it into a
//! [`RecordStore`].
//!
//! # States
//! - `MainMenu` → `TableSubmenu(table)` (1–5), `ReportSubmenu` (6), `Terminated` (0)
//! - `TableSubmenu(table)` → 1 list, 2 add, 3 remove, 4 update (simple entities only), 0 back
//! - `ReportSubmenu` → 1–4 run a report, 0 back
//!
//! # Console Protocol
//! - Integer prompts (`:> `) read one line and parse its first token. Blank
//!   lines are skipped. A non-integer token is fatal.
//! - Text prompts read one full line verbatim, without the terminator.
//! - End of input at an integer prompt terminates the session.
//!
//! Only failed outcomes print their message. Successful reads and reports
//! print their rendered rows; successful writes print nothing.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::{RecordsError, Result};
use crate::output::Outcome;
use crate::query::RecordStore;
use crate::report::Report;
use crate::schema::{Action, Table};

/// Prompt for integer menu selections
pub const PROMPT: &str = ":> ";

/// Notice for selections outside the current menu
pub const UNRECOGNISED: &str = "Input not recognised, try again.";

/// Notice printed after a failure message
pub const RETRY: &str = "Please try again";

/// Farewell printed when quitting from the main menu
pub const GOODBYE: &str = "Quitting, goodbye.";

const RULE: &str = "***************************";

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    MainMenu,
    TableSubmenu(Table),
    ReportSubmenu,
    Terminated,
}

/// Interactive session over a record store and a pair of console streams
pub struct Session<S, R, W> {
    store: S,
    input: R,
    output: W,
}

impl<S: RecordStore, R: BufRead, W: Write> Session<S, R, W> {
    pub const fn new(store: S, input: R, output: W) -> Self {
        Self { store, input, output }
    }

    /// Run until the user quits or input ends
    ///
    /// # Errors
    ///
    /// Returns fatal errors only: console I/O failures and non-integer
    /// menu selections.
    pub fn run(&mut self) -> Result<()> {
        let mut state = State::MainMenu;
        while state != State::Terminated {
            state = self.step(state)?;
        }
        self.output.flush()?;
        Ok(())
    }

    /// Perform one transition: read one selection and act on it
    pub fn step(&mut self, state: State) -> Result<State> {
        match state {
            State::MainMenu => self.main_menu(),
            State::TableSubmenu(table) => self.table_submenu(table),
            State::ReportSubmenu => self.report_submenu(),
            State::Terminated => Ok(State::Terminated),
        }
    }

    /// Take back the store and streams
    pub fn into_parts(self) -> (S, R, W) {
        (self.store, self.input, self.output)
    }

    fn main_menu(&mut self) -> Result<State> {
        self.display_main_menu()?;
        let Some(choice) = self.read_int()? else {
            return Ok(State::Terminated);
        };

        let table = match choice {
            1 => Table::Student,
            2 => Table::Module,
            3 => Table::Staff,
            4 => Table::Registered,
            5 => Table::Teaches,
            6 => {
                self.display_report_menu()?;
                return Ok(State::ReportSubmenu);
            }
            0 => {
                write!(self.output, "{GOODBYE}")?;
                return Ok(State::Terminated);
            }
            _ => {
                writeln!(self.output, "{UNRECOGNISED}")?;
                return Ok(State::MainMenu);
            }
        };

        self.display_table_menu(table)?;
        Ok(State::TableSubmenu(table))
    }

    fn table_submenu(&mut self, table: Table) -> Result<State> {
        let Some(choice) = self.read_int()? else {
            return Ok(State::Terminated);
        };

        match choice {
            1 => {
                let outcome = self.store.execute(Action::Read, table, &[]);
                self.render(&outcome, true)?;
            }
            2 => {
                let params = self.collect_create_params(table)?;
                let outcome = self.store.execute(Action::Create, table, &params);
                self.render(&outcome, false)?;
            }
            3 => {
                let id = self.read_text("Enter ID :> ")?;
                let outcome = self.store.execute(Action::Delete, table, &[id]);
                self.render(&outcome, false)?;
            }
            4 if !table.is_join() => {
                let params = vec![
                    self.read_text("Enter ID :> ")?,
                    self.read_text("Enter column :> ")?,
                    self.read_text("Enter value :> ")?,
                ];
                let outcome = self.store.execute(Action::Update, table, &params);
                self.render(&outcome, false)?;
            }
            0 => {
                writeln!(self.output)?;
                return Ok(State::MainMenu);
            }
            _ => writeln!(self.output, "{UNRECOGNISED}")?,
        }

        Ok(State::TableSubmenu(table))
    }

    fn report_submenu(&mut self) -> Result<State> {
        let Some(choice) = self.read_int()? else {
            return Ok(State::Terminated);
        };

        let report = match choice {
            1 => Report::ModulesTaughtBy,
            2 => Report::StudentsOfModule,
            3 => Report::StaffTeachingStudent,
            4 => Report::StaffTeachingMultiple,
            0 => {
                writeln!(self.output)?;
                return Ok(State::MainMenu);
            }
            _ => {
                writeln!(self.output, "{UNRECOGNISED}")?;
                return Ok(State::ReportSubmenu);
            }
        };

        let input = match report.input_label() {
            Some(label) => Some(self.read_text(&format!("Enter {label} :> "))?),
            None => None,
        };
        let outcome = self.store.report(report, input.as_deref());
        self.render(&outcome, true)?;

        Ok(State::ReportSubmenu)
    }

    fn collect_create_params(&mut self, table: Table) -> Result<Vec<String>> {
        let prompts: &[&str] = match table {
            Table::Student => &["Enter ID :> ", "Enter name :> ", "Enter degree scheme :> "],
            Table::Module => &["Enter ID :> ", "Enter name :> ", "Enter credits :> "],
            Table::Staff => &["Enter ID :> ", "Enter name :> ", "Enter grade :> "],
            Table::Registered => &["Enter student ID :> ", "Enter module ID :> "],
            Table::Teaches => &["Enter staff ID :> ", "Enter module ID :> "],
        };

        prompts.iter().map(|prompt| self.read_text(prompt)).collect()
    }

    fn render(&mut self, outcome: &Outcome, show_rows: bool) -> Result<()> {
        if !outcome.ok {
            writeln!(self.output, "{}", outcome.message)?;
            writeln!(self.output, "{RETRY}")?;
        } else if show_rows {
            for line in outcome.rendered_rows() {
                writeln!(self.output, "{line}")?;
            }
        }
        Ok(())
    }

    fn display_main_menu(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "Main Menu\n{RULE}\n1. Students\n2. Modules\n3. Staff\n4. Registrations\n\
             5. Teaches\n6. Reports\n0. Quit\n"
        )?;
        Ok(())
    }

    fn display_table_menu(&mut self, table: Table) -> Result<()> {
        let name = table.label();
        write!(
            self.output,
            "\n{name} Menu\n{RULE}\n1. List {}\n2. Add {name}\n3. Remove {name}\n",
            table.plural_label()
        )?;
        if !table.is_join() {
            writeln!(self.output, "4. Update {name}")?;
        }
        writeln!(self.output, "0. Back\n")?;
        Ok(())
    }

    fn display_report_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\nReport Menu\n{RULE}")?;
        for (idx, report) in Report::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {}", idx + 1, report.label())?;
        }
        writeln!(self.output, "0. Back\n")?;
        Ok(())
    }

    /// Prompt for a menu selection; `None` means input ended
    fn read_int(&mut self) -> Result<Option<i64>> {
        write!(self.output, "{PROMPT}")?;
        self.output.flush()?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                debug!("console input ended");
                return Ok(None);
            }
            if let Some(token) = line.split_whitespace().next() {
                return token.parse::<i64>().map(Some).map_err(|_| {
                    RecordsError::invalid_input(format!("expected a menu number, got '{token}'"))
                });
            }
        }
    }

    /// Prompt for a free-text value, returned verbatim without the terminator
    fn read_text(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(RecordsError::invalid_input("unexpected end of input"));
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Cursor;

    use crate::engine::{Cell, ResultSet};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Execute(Action, Table, Vec<String>),
        Report(Report, Option<String>),
    }

    /// Record store that remembers calls and answers with a fixed outcome
    struct Recorder {
        calls: RefCell<Vec<Call>>,
        outcome: Outcome,
    }

    impl Recorder {
        fn answering(outcome: Outcome) -> Self {
            Self { calls: RefCell::new(Vec::new()), outcome }
        }
    }

    impl RecordStore for Recorder {
        fn execute(&self, action: Action, table: Table, params: &[String]) -> Outcome {
            self.calls.borrow_mut().push(Call::Execute(action, table, params.to_vec()));
            self.outcome.clone()
        }

        fn report(&self, report: Report, input: Option<&str>) -> Outcome {
            self.calls.borrow_mut().push(Call::Report(report, input.map(str::to_string)));
            self.outcome.clone()
        }
    }

    fn drive(script: &str, outcome: Outcome) -> (Vec<Call>, String) {
        let mut session =
            Session::new(Recorder::answering(outcome), Cursor::new(script.to_string()), Vec::new());
        session.run().unwrap();
        let (store, _, output) = session.into_parts();
        (store.calls.into_inner(), String::from_utf8(output).unwrap())
    }

    fn one_row() -> Outcome {
        Outcome::rows(ResultSet {
            columns: vec!["student_id".into()],
            rows: vec![vec![Cell::Text("s1".into())]],
        })
    }

    #[test]
    fn test_quit_from_main_menu() {
        let (calls, output) = drive("0\n", Outcome::written());
        assert!(calls.is_empty());
        assert!(output.starts_with("Main Menu\n"));
        assert!(output.ends_with(":> Quitting, goodbye."));
    }

    #[test]
    fn test_unknown_main_selection_redisplays_menu() {
        let (calls, output) = drive("9\n0\n", Outcome::written());
        assert!(calls.is_empty());
        assert_eq!(output.matches("Main Menu").count(), 2);
        assert!(output.contains(UNRECOGNISED));
    }

    #[test]
    fn test_read_prints_rows() {
        let (calls, output) = drive("1\n1\n0\n0\n", one_row());
        assert_eq!(calls, vec![Call::Execute(Action::Read, Table::Student, vec![])]);
        assert!(output.contains("Student Menu"));
        assert!(output.contains(&format!("{:>30} ", "s1")));
    }

    #[test]
    fn test_create_collects_table_specific_fields() {
        let (calls, output) = drive("2\n2\nm1\nRust Programming\n20\n0\n0\n", Outcome::written());
        assert_eq!(
            calls,
            vec![Call::Execute(
                Action::Create,
                Table::Module,
                vec!["m1".into(), "Rust Programming".into(), "20".into()]
            )]
        );
        assert!(output.contains("Enter credits :> "));
        assert!(!output.contains("Update Successful"));
    }

    #[test]
    fn test_create_join_table_collects_two_ids() {
        let (calls, output) = drive("4\n2\ns1\nm1\n0\n0\n", Outcome::written());
        assert_eq!(
            calls,
            vec![Call::Execute(Action::Create, Table::Registered, vec!["s1".into(), "m1".into()])]
        );
        assert!(output.contains("Enter student ID :> Enter module ID :> "));
    }

    #[test]
    fn test_update_disabled_for_join_tables() {
        for menu in ["4", "5"] {
            let (calls, output) = drive(&format!("{menu}\n4\n0\n0\n"), Outcome::written());
            assert!(calls.is_empty(), "menu {menu}");
            assert!(output.contains(UNRECOGNISED));
            assert!(!output.contains("4. Update"));
        }
    }

    #[test]
    fn test_update_collects_three_fields() {
        let (calls, _) = drive("3\n4\nst1\ngrade\nSenior Lecturer\n0\n0\n", Outcome::written());
        assert_eq!(
            calls,
            vec![Call::Execute(
                Action::Update,
                Table::Staff,
                vec!["st1".into(), "grade".into(), "Senior Lecturer".into()]
            )]
        );
    }

    #[test]
    fn test_failure_prints_message_and_retry() {
        let failed = Outcome::from_error(&RecordsError::statement("UNIQUE constraint failed"));
        let (_, output) = drive("1\n3\ns1\n0\n0\n", failed);
        assert!(output.contains("UNIQUE constraint failed\nPlease try again\n"));
    }

    #[test]
    fn test_reports_collect_input() {
        let (calls, output) = drive("6\n1\nst1\n3\ns1\n4\n0\n0\n", one_row());
        assert_eq!(
            calls,
            vec![
                Call::Report(Report::ModulesTaughtBy, Some("st1".into())),
                Call::Report(Report::StaffTeachingStudent, Some("s1".into())),
                Call::Report(Report::StaffTeachingMultiple, None),
            ]
        );
        assert!(output.contains("Enter staff id :> "));
        assert!(output.contains("Enter student id :> "));
    }

    #[test]
    fn test_unknown_submenu_selection_stays() {
        let mut session =
            Session::new(Recorder::answering(Outcome::written()), Cursor::new("7\n"), Vec::new());
        let next = session.step(State::TableSubmenu(Table::Staff)).unwrap();
        assert_eq!(next, State::TableSubmenu(Table::Staff));

        let mut session =
            Session::new(Recorder::answering(Outcome::written()), Cursor::new("7\n"), Vec::new());
        assert_eq!(session.step(State::ReportSubmenu).unwrap(), State::ReportSubmenu);
    }

    #[test]
    fn test_back_returns_to_main_menu() {
        let mut session =
            Session::new(Recorder::answering(Outcome::written()), Cursor::new("0\n"), Vec::new());
        assert_eq!(session.step(State::TableSubmenu(Table::Module)).unwrap(), State::MainMenu);
    }

    #[test]
    fn test_blank_lines_are_skipped_and_text_is_verbatim() {
        let (calls, _) = drive("\n  1   \n3\n  padded id  \n0\n0\n", Outcome::written());
        assert_eq!(
            calls,
            vec![Call::Execute(Action::Delete, Table::Student, vec!["  padded id  ".into()])]
        );
    }

    #[test]
    fn test_crlf_terminators_are_stripped() {
        let (calls, _) = drive("1\r\n3\r\ns1\r\n0\r\n0\r\n", Outcome::written());
        assert_eq!(calls, vec![Call::Execute(Action::Delete, Table::Student, vec!["s1".into()])]);
    }

    #[test]
    fn test_non_integer_selection_is_fatal() {
        let mut session =
            Session::new(Recorder::answering(Outcome::written()), Cursor::new("abc\n"), Vec::new());
        let err = session.run().unwrap_err();
        assert!(matches!(err, RecordsError::InvalidInput(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_end_of_input_terminates() {
        let (calls, _) = drive("1\n", Outcome::written());
        assert!(calls.is_empty());
    }

    #[test]
    fn test_end_of_input_at_text_prompt_is_fatal() {
        let mut session =
            Session::new(Recorder::answering(Outcome::written()), Cursor::new("1\n3\n"), Vec::new());
        let err = session.run().unwrap_err();
        assert!(matches!(err, RecordsError::InvalidInput(_)));
    }
}
