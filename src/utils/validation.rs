//! Command-line argument validation.
//!
//! These functions are used as clap value parsers, so a bad argument is
//! reported together with the usage text before any work starts.

use std::path::PathBuf;

use crate::error::AnalysisError;

/// Accept a path only if it names an existing directory
///
/// # Examples
/// ```
/// use floodns_analysis::utils::validation::parse_existing_dir;
///
/// assert!(parse_existing_dir(".").is_ok());
/// assert!(parse_existing_dir("/nonexistent/run/folder").is_err());
/// ```
pub fn parse_existing_dir(value: &str) -> Result<PathBuf, AnalysisError> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(AnalysisError::Usage(format!(
            "The folder path does not exist: {}",
            value
        )))
    }
}

/// Parse a worker count, which must be a positive integer
///
/// # Examples
/// ```
/// use floodns_analysis::utils::validation::parse_worker_count;
///
/// assert_eq!(parse_worker_count("4").unwrap(), 4);
/// assert!(parse_worker_count("0").is_err());
/// ```
pub fn parse_worker_count(value: &str) -> Result<usize, AnalysisError> {
    match value.parse::<usize>() {
        Ok(0) => Err(AnalysisError::Usage(
            "Number of workers must be at least 1".to_string(),
        )),
        Ok(n) => Ok(n),
        Err(_) => Err(AnalysisError::Usage(format!(
            "'{}' is not a valid number of workers",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_existing_dir() {
        let dir = TempDir::new().unwrap();
        let value = dir.path().to_str().unwrap();
        assert_eq!(parse_existing_dir(value).unwrap(), dir.path());
    }

    #[test]
    fn test_file_is_not_a_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("flow_info.csv");
        std::fs::write(&file, "").unwrap();
        assert!(matches!(
            parse_existing_dir(file.to_str().unwrap()),
            Err(AnalysisError::Usage(_))
        ));
    }

    #[test]
    fn test_worker_count() {
        assert_eq!(parse_worker_count("16").unwrap(), 16);
        assert!(parse_worker_count("-2").is_err());
        assert!(parse_worker_count("four").is_err());
    }
}
