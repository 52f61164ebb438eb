//! CSV fixture files for the test repository
//!
//! Every header and value is wrapped in double quotes. Quote and backslash
//! characters inside a field are escaped with a leading backslash. Row
//! widths are checked against the header before any file is created.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use search_types::RecordId;

use crate::error::{HarnessError, Result};

/// Quote one CSV field
pub fn csv_quote(text: &str) -> String {
    if !text.contains(['"', '\\']) {
        return format!("\"{}\"", text);
    }
    let mut quoted = String::with_capacity(text.len() * 2 + 2);
    quoted.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Relationship key shared by both sides of a relationship
///
/// The two record ids in lexicographic order, joined by `|`.
pub fn relationship_key(a: &RecordId, b: &RecordId) -> String {
    let (first, second) = if a.record_id <= b.record_id {
        (&a.record_id, &b.record_id)
    } else {
        (&b.record_id, &a.record_id)
    };
    format!("{}|{}", first, second)
}

/// Check that every row is as wide as the header
pub fn validate_rows<R: AsRef<[String]>>(headers: &[String], rows: &[R]) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        let received = row.as_ref().len();
        if received != headers.len() {
            return Err(HarnessError::FieldCountMismatch {
                expected: headers.len(),
                received,
                index,
            });
        }
    }
    Ok(())
}

fn write_line<W: Write>(out: &mut W, fields: &[String]) -> std::io::Result<()> {
    let line: Vec<String> = fields.iter().map(|f| csv_quote(f)).collect();
    writeln!(out, "{}", line.join(","))
}

/// Write a header line followed by one line per row
pub fn write_csv<W: Write>(out: &mut W, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    validate_rows(headers, rows)?;
    write_line(out, headers)?;
    for row in rows {
        write_line(out, row)?;
    }
    out.flush()?;
    Ok(())
}

/// CSV body as a string
pub fn csv_text(headers: &[String], rows: &[Vec<String>]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, headers, rows)?;
    String::from_utf8(buffer).map_err(|e| HarnessError::invalid_argument(e.to_string()))
}

/// One data source worth of fixture rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureTable {
    pub data_source: String,
    pub file_prefix: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl FixtureTable {
    pub fn new<H: Into<String>>(
        data_source: impl Into<String>,
        file_prefix: impl Into<String>,
        headers: impl IntoIterator<Item = H>,
    ) -> Self {
        Self {
            data_source: data_source.into(),
            file_prefix: file_prefix.into(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<V: Into<String>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_rows(&self.headers, &self.rows)
    }

    /// Write to a fresh `<prefix>XXXX.csv` file inside `dir`
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        self.validate()?;

        let mut temp = tempfile::Builder::new()
            .prefix(&self.file_prefix)
            .suffix(".csv")
            .tempfile_in(dir)?;
        {
            let mut out = BufWriter::new(temp.as_file_mut());
            write_csv(&mut out, &self.headers, &self.rows)?;
        }
        // only a fully flushed file survives; on error the temp file is removed
        let (_, path) = temp.keep().map_err(|e| e.error)?;

        debug!(
            data_source = %self.data_source,
            rows = self.rows.len(),
            path = %path.display(),
            "Wrote fixture file"
        );
        Ok(path)
    }
}

/// A fixture file written for one data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureFile {
    pub data_source: String,
    pub path: PathBuf,
    pub record_count: usize,
}

/// Data sources and files for the external repository loader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureManifest {
    pub data_sources: Vec<String>,
    pub files: Vec<FixtureFile>,
}

impl FixtureManifest {
    pub const FILE_NAME: &'static str = "fixtures.json";

    pub fn read(dir: &Path) -> Result<Self> {
        let text = fs::read_to_string(dir.join(Self::FILE_NAME))?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Write every table into `dir` plus a `fixtures.json` manifest
///
/// All tables are validated first so a bad row leaves `dir` untouched.
pub fn prepare_fixtures(dir: &Path, tables: &[FixtureTable]) -> Result<FixtureManifest> {
    for table in tables {
        table.validate()?;
    }

    let mut manifest = FixtureManifest::default();
    for table in tables {
        let path = table.write_to(dir)?;
        if !manifest.data_sources.contains(&table.data_source) {
            manifest.data_sources.push(table.data_source.clone());
        }
        manifest.files.push(FixtureFile {
            data_source: table.data_source.clone(),
            path,
            record_count: table.rows.len(),
        });
    }

    let manifest_path = dir.join(FixtureManifest::FILE_NAME);
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
    info!(
        files = manifest.files.len(),
        manifest = %manifest_path.display(),
        "Prepared fixture repository files"
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_fields_always_quoted() {
        let text = csv_text(
            &strings(&["RECORD_ID", "NAME_FIRST"]),
            &[strings(&["X1", "Jane"])],
        )
        .unwrap();
        assert_eq!(text, "\"RECORD_ID\",\"NAME_FIRST\"\n\"X1\",\"Jane\"\n");
    }

    #[test]
    fn test_quote_and_backslash_escaped() {
        assert_eq!(csv_quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(csv_quote(r"C:\tmp"), r#""C:\\tmp""#);
        assert_eq!(csv_quote(""), r#""""#);
    }

    #[test]
    fn test_row_width_mismatch_reported() {
        let err = validate_rows(&strings(&["A", "B"]), &[strings(&["1", "2"]), strings(&["1"])])
            .unwrap_err();
        match err {
            HarnessError::FieldCountMismatch {
                expected,
                received,
                index,
            } => assert_eq!((expected, received, index), (2, 1, 1)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_relationship_key_is_order_independent() {
        let a = RecordId::new("MARRIAGES", "EFG789");
        let b = RecordId::new("MARRIAGES", "FGH012");
        assert_eq!(relationship_key(&a, &b), "EFG789|FGH012");
        assert_eq!(relationship_key(&b, &a), "EFG789|FGH012");
    }

    #[test]
    fn test_table_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let table = FixtureTable::new("VIPS", "test-vips-", ["RECORD_ID", "NAME_LAST"])
            .row(["STU901", "Doe"]);
        let path = table.write_to(dir.path()).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("test-vips-") && name.ends_with(".csv"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "\"RECORD_ID\",\"NAME_LAST\"\n\"STU901\",\"Doe\"\n"
        );
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_surfaces_as_io_error() {
        let headers = strings(&["RECORD_ID"]);
        let mut out = BufWriter::new(FullDisk);
        let err = write_csv(&mut out, &headers, &[strings(&["X1"])]).unwrap_err();
        assert!(matches!(err, HarnessError::Io(_)));
    }

    #[test]
    fn test_write_to_leaves_only_the_finished_file() {
        let dir = tempfile::tempdir().unwrap();
        let table = FixtureTable::new("VIPS", "test-vips-", ["RECORD_ID"]).row(["STU901"]);
        let path = table.write_to(dir.path()).unwrap();

        let entries: Vec<PathBuf> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries, vec![path.clone()]);
        assert!(fs::read_to_string(&path).unwrap().ends_with("\"STU901\"\n"));
    }

    #[test]
    fn test_bad_table_leaves_dir_empty() {
        let dir = tempfile::tempdir().unwrap();
        let good = FixtureTable::new("A", "a-", ["X"]).row(["1"]);
        let bad = FixtureTable::new("B", "b-", ["X", "Y"]).row(["1"]);

        assert!(prepare_fixtures(dir.path(), &[good, bad]).is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
