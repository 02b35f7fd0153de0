//! Schema-checked reader for the simulator's comma-separated info logs.
//!
//! Every line must match the schema's arity and column kinds. The read is
//! all-or-nothing: the first malformed line aborts it with an error naming
//! that line, and no records are returned.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{AnalysisError, Result};

/// Column delimiter of the info logs
pub const COLUMN_DELIMITER: char = ',';

/// Log file suffixes, in order of preference
pub const LOG_FILE_SUFFIXES: &[&str] = &[".csv", ".csv.log"];

/// Declared type of one log column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Non-negative integer
    Integer,
    /// Non-negative, finite floating-point number
    Real,
    /// Free-form string, kept verbatim
    Text,
}

/// A column value coerced to its declared kind
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Integer(u64),
    Real(f64),
    Text(String),
}

/// Record-level failure, before the reader attaches file and line
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    Violation(String),
    InvalidEnum { column: &'static str, value: String },
}

/// The coerced columns of one line, consumed front to back by a record parser
#[derive(Debug)]
pub struct Fields {
    inner: std::vec::IntoIter<Field>,
    position: usize,
}

impl Fields {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            inner: fields.into_iter(),
            position: 0,
        }
    }

    fn next_field(&mut self) -> Result<Field, RecordError> {
        self.position += 1;
        self.inner.next().ok_or_else(|| {
            RecordError::Violation(format!("missing column {}", self.position))
        })
    }

    pub fn integer(&mut self) -> Result<u64, RecordError> {
        match self.next_field()? {
            Field::Integer(v) => Ok(v),
            other => Err(self.mismatch("integer", &other)),
        }
    }

    pub fn real(&mut self) -> Result<f64, RecordError> {
        match self.next_field()? {
            Field::Real(v) => Ok(v),
            other => Err(self.mismatch("real", &other)),
        }
    }

    pub fn text(&mut self) -> Result<String, RecordError> {
        match self.next_field()? {
            Field::Text(v) => Ok(v),
            other => Err(self.mismatch("text", &other)),
        }
    }

    fn mismatch(&self, expected: &str, found: &Field) -> RecordError {
        RecordError::Violation(format!(
            "column {} is declared {} but holds {:?}",
            self.position, expected, found
        ))
    }
}

/// A typed record with a fixed positional schema
pub trait LogRecord: Sized {
    /// File name of the log without suffix, e.g. `flow_info`
    const FILE_STEM: &'static str;
    /// Column kinds in file order; the length is the required arity
    const SCHEMA: &'static [ColumnKind];

    fn from_fields(fields: Fields) -> std::result::Result<Self, RecordError>;
}

/// Coerce a single column value
fn coerce(raw: &str, kind: ColumnKind, column: usize) -> std::result::Result<Field, String> {
    match kind {
        ColumnKind::Integer => raw.parse::<u64>().map(Field::Integer).map_err(|_| {
            format!("column {}: '{}' is not a non-negative integer", column, raw)
        }),
        ColumnKind::Real => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(Field::Real(v)),
            _ => Err(format!(
                "column {}: '{}' is not a non-negative number",
                column, raw
            )),
        },
        ColumnKind::Text => Ok(Field::Text(raw.to_string())),
    }
}

/// Split one line and coerce every column against the schema
pub fn parse_line(line: &str, schema: &[ColumnKind]) -> std::result::Result<Vec<Field>, String> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let columns: Vec<&str> = line.split(COLUMN_DELIMITER).collect();

    if columns.len() != schema.len() {
        return Err(format!(
            "expected {} columns, found {}",
            schema.len(),
            columns.len()
        ));
    }

    columns
        .iter()
        .zip(schema)
        .enumerate()
        .map(|(i, (raw, kind))| coerce(raw, *kind, i + 1))
        .collect()
}

/// Visit every line of a log as coerced fields, stopping at the first error
fn for_each_row<F>(path: &Path, schema: &[ColumnKind], mut visit: F) -> Result<()>
where
    F: FnMut(usize, Vec<Field>) -> Result<()>,
{
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AnalysisError::MissingInputFile {
            path: path.to_path_buf(),
        },
        _ => AnalysisError::io(path, e),
    })?;
    let reader = BufReader::with_capacity(64 * 1024, file);

    for (index, line_result) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line_result.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => AnalysisError::SchemaViolation {
                path: path.to_path_buf(),
                line: line_no,
                reason: "line is not valid UTF-8".to_string(),
            },
            _ => AnalysisError::io(path, e),
        })?;
        let fields = parse_line(&line, schema).map_err(|reason| AnalysisError::SchemaViolation {
            path: path.to_path_buf(),
            line: line_no,
            reason,
        })?;
        visit(line_no, fields)?;
    }

    Ok(())
}

/// Read a log against an arbitrary schema, returning the coerced rows
pub fn read_rows(path: &Path, schema: &[ColumnKind]) -> Result<Vec<Vec<Field>>> {
    let mut rows = Vec::new();
    for_each_row(path, schema, |_, fields| {
        rows.push(fields);
        Ok(())
    })?;
    Ok(rows)
}

/// Read a log into typed records
pub fn read_log<R: LogRecord>(path: &Path) -> Result<Vec<R>> {
    let mut records = Vec::new();
    for_each_row(path, R::SCHEMA, |line, fields| {
        let record = R::from_fields(Fields::new(fields)).map_err(|e| match e {
            RecordError::Violation(reason) => AnalysisError::SchemaViolation {
                path: path.to_path_buf(),
                line,
                reason,
            },
            RecordError::InvalidEnum { column, value } => AnalysisError::InvalidEnumValue {
                path: path.to_path_buf(),
                line,
                column,
                value,
            },
        })?;
        records.push(record);
        Ok(())
    })?;

    log::debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Locate the log of a record family inside a run directory
pub fn resolve_log_path(run_dir: &Path, file_stem: &str) -> Result<PathBuf> {
    LOG_FILE_SUFFIXES
        .iter()
        .map(|suffix| run_dir.join(format!("{}{}", file_stem, suffix)))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| AnalysisError::MissingInputFile {
            path: run_dir.join(format!("{}{}", file_stem, LOG_FILE_SUFFIXES[0])),
        })
}
