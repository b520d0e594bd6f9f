//! Session Integration Tests
//!
//! Drives scripted console input through a full session backed by a real
//! `SQLite` records database.

mod common;

use std::io::Cursor;

use common::{
    cleanup, count, create_records_db, seed, unique_db_path, CountingProvider,
};
use records::session::{GOODBYE, RETRY, UNRECOGNISED};
use records::{DataSourceConfig, Dispatcher, RecordsError, Session, SqliteProvider};

fn run_script(path: &std::path::Path, script: &str) -> String {
    let dispatcher = Dispatcher::new(SqliteProvider::new(&DataSourceConfig::sqlite(path)).unwrap());
    let mut session = Session::new(dispatcher, Cursor::new(script.to_string()), Vec::new());
    session.run().unwrap();

    let (_, _, output) = session.into_parts();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_add_list_remove_student() {
    let path = create_records_db();

    let output = run_script(&path, "1\n2\ns1\nAnn\nCS\n1\n3\ns1\n1\n0\n0\n");

    assert!(output.contains(&format!("{:>30} {:>30} {:>30} ", "s1", "Ann", "CS")));
    assert!(output.contains("No Data\nPlease try again\n"));
    assert!(output.ends_with(GOODBYE));
    assert_eq!(count(&path, "student", "1 = 1"), 0);

    cleanup(&path);
}

#[test]
fn test_update_module_credits_through_menus() {
    let path = create_records_db();
    seed(&path, "INSERT INTO module VALUES ('m1', 'Databases', 20)");

    let output = run_script(&path, "2\n4\nm1\ncredits\n40\n0\n0\n");

    assert!(!output.contains(RETRY));
    assert_eq!(count(&path, "module", "typeof(credits) = 'integer' AND credits = 40"), 1);

    cleanup(&path);
}

#[test]
fn test_invalid_credits_prints_retry_and_session_continues() {
    let path = create_records_db();

    let output = run_script(&path, "2\n2\nm1\nRust\nlots\n2\nm1\nRust\n20\n0\n0\n");

    assert_eq!(output.matches(RETRY).count(), 1);
    assert_eq!(count(&path, "module", "module_id = 'm1' AND credits = 20"), 1);

    cleanup(&path);
}

#[test]
fn test_report_through_menus() {
    let path = create_records_db();
    seed(
        &path,
        "INSERT INTO staff VALUES ('st1', 'Dr Kim', 'Lecturer');
         INSERT INTO module VALUES ('m1', 'Databases', 20);
         INSERT INTO module VALUES ('m2', 'Compilers', 20);
         INSERT INTO teaches VALUES ('st1', 'm1');
         INSERT INTO teaches VALUES ('st1', 'm2');",
    );

    let output = run_script(&path, "6\n1\nst1\n4\n0\n0\n");

    assert!(output.contains("Report Menu"));
    assert!(output.contains(&format!("{:>30} ", "Databases")));
    assert!(output.contains(&format!("{:>30} ", "Compilers")));
    assert!(output.contains(&format!("{:>30} ", "Dr Kim")));
    assert!(!output.contains(RETRY));

    cleanup(&path);
}

#[test]
fn test_join_table_update_never_reaches_store() {
    let path = create_records_db();
    let provider = CountingProvider::new(&path);

    for menu in ["4", "5"] {
        let script = format!("{menu}\n4\n0\n0\n");
        let mut session = Session::new(Dispatcher::new(&provider), Cursor::new(script), Vec::new());
        session.run().unwrap();

        let (_, _, output) = session.into_parts();
        assert!(String::from_utf8(output).unwrap().contains(UNRECOGNISED));
    }
    assert_eq!(provider.opened(), 0);

    cleanup(&path);
}

#[test]
fn test_missing_database_is_reported_not_fatal() {
    let path = unique_db_path("missing");

    let output = run_script(&path, "3\n1\n0\n0\n");
    assert!(output.contains("Connection failed"));
    assert!(output.contains(RETRY));
    assert!(!path.exists());
}

#[test]
fn test_garbage_selection_ends_session_with_error() {
    let path = create_records_db();
    let provider = CountingProvider::new(&path);

    let mut session =
        Session::new(Dispatcher::new(&provider), Cursor::new("1\nlist\n".to_string()), Vec::new());
    let err = session.run().unwrap_err();
    assert!(matches!(err, RecordsError::InvalidInput(_)));
    assert_eq!(provider.opened(), 0);

    cleanup(&path);
}
