//! Fixture files for the test repository
//!
//! Writes the standard tables into a temp directory and reads them back the
//! way the external loader would.

use std::fs;

use attr_search_harness::catalog::{self, DATA_SOURCES};
use attr_search_harness::{prepare_fixtures, FixtureManifest, FixtureTable, HarnessError};

#[test]
fn test_standard_fixtures_written_with_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = prepare_fixtures(dir.path(), &catalog::fixture_tables()).unwrap();

    assert_eq!(manifest.data_sources, DATA_SOURCES.to_vec());
    assert_eq!(manifest.files.len(), 4);

    let reread = FixtureManifest::read(dir.path()).unwrap();
    assert_eq!(reread, manifest);

    for file in &manifest.files {
        assert!(file.path.starts_with(dir.path()));
        let text = fs::read_to_string(&file.path).unwrap();
        // header plus one line per record
        assert_eq!(text.lines().count(), file.record_count + 1);
        assert!(text.starts_with("\"RECORD_ID\","));
    }
}

#[test]
fn test_passenger_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = prepare_fixtures(dir.path(), &[catalog::passengers()]).unwrap();
    let text = fs::read_to_string(&manifest.files[0].path).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        r#""RECORD_ID","NAME_FIRST","NAME_LAST","PHONE_NUMBER","ADDR_FULL","DATE_OF_BIRTH""#
    );
    assert_eq!(
        lines[1],
        concat!(
            r#""ABC123","Joe","Schmoe","702-555-1212","#,
            r#""101 Main Street, Las Vegas, NV 89101","1981-01-12""#
        )
    );
}

#[test]
fn test_escaped_values_survive_file_write() {
    let dir = tempfile::tempdir().unwrap();
    let table = FixtureTable::new("QUOTES", "test-quotes-", ["RECORD_ID", "NOTE"])
        .row(["Q1", r#"called himself "The Bat""#])
        .row(["Q2", r"path\to\cave"]);
    let manifest = prepare_fixtures(dir.path(), &[table]).unwrap();
    let text = fs::read_to_string(&manifest.files[0].path).unwrap();

    assert!(text.contains(r#""Q1","called himself \"The Bat\"""#));
    assert!(text.contains(r#""Q2","path\\to\\cave""#));
}

#[test]
fn test_mismatched_row_fails_before_io() {
    let dir = tempfile::tempdir().unwrap();
    let table = FixtureTable::new("BAD", "test-bad-", ["RECORD_ID", "NAME_FIRST"])
        .row(["X1", "Jane"])
        .row(["X2"]);

    let err = prepare_fixtures(dir.path(), &[table]).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::FieldCountMismatch {
            expected: 2,
            received: 1,
            index: 1
        }
    ));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
