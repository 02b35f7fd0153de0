//! Error taxonomy for log ingestion and statistics.
//!
//! Every error is local to one run: the per-run analysis stops at the first
//! one, and the batch orchestrator only ever sees it as a non-zero exit.

use std::path::PathBuf;

/// Errors that abort the analysis of a single run
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Wrong column count, or a value that cannot be coerced to its column kind
    #[error("Schema violation in {} line {line}: {reason}", path.display())]
    SchemaViolation {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A token outside the accepted set of an enumerated column
    #[error("Invalid value {value:?} in column '{column}' of {} line {line}", path.display())]
    InvalidEnumValue {
        path: PathBuf,
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("Missing input file: {}", path.display())]
    MissingInputFile { path: PathBuf },

    #[error("{0}")]
    Usage(String),

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_file_and_line() {
        let err = AnalysisError::SchemaViolation {
            path: PathBuf::from("run/flow_info.csv"),
            line: 7,
            reason: "expected 10 columns, found 9".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("run/flow_info.csv"));
        assert!(msg.contains("line 7"));
        assert!(msg.contains("expected 10 columns"));

        let err = AnalysisError::InvalidEnumValue {
            path: PathBuf::from("connection_info.csv"),
            line: 3,
            column: "completed",
            value: "X".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value \"X\" in column 'completed' of connection_info.csv line 3"
        );
    }
}
