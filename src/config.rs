use serde::{Deserialize, Serialize};

/// Name of the per-run output directory unless configured otherwise
pub const DEFAULT_ANALYSIS_DIR: &str = "analysis";

/// Upper size bound used by the default connection analysis
pub const DEFAULT_SIZE_UPPER_BOUND: f64 = 10_000_000_000.0;

/// Top-level analysis configuration, mirroring the optional YAML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Subdirectory of the run directory that receives the reports
    pub analysis_dir: String,
    /// Inclusive filter on the connection "total size" column
    pub connection_size_bounds: SizeBounds,
}

/// Inclusive `[lower, upper]` range on a connection's total size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeBounds {
    pub lower: f64,
    pub upper: f64,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid analysis directory: {0}")]
    InvalidAnalysisDir(String),
    #[error("Invalid connection size bounds: {0}")]
    InvalidSizeBounds(String),
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            analysis_dir: DEFAULT_ANALYSIS_DIR.to_string(),
            connection_size_bounds: SizeBounds::default(),
        }
    }
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: DEFAULT_SIZE_UPPER_BOUND,
        }
    }
}

impl AnalysisConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let dir = self.analysis_dir.trim();
        if dir.is_empty() {
            return Err(ValidationError::InvalidAnalysisDir(
                "analysis_dir cannot be empty".to_string(),
            ));
        }
        if dir != self.analysis_dir {
            return Err(ValidationError::InvalidAnalysisDir(format!(
                "analysis_dir has leading or trailing whitespace: '{}'",
                self.analysis_dir
            )));
        }
        if dir.contains('/') || dir.contains('\\') || dir == "." || dir == ".." {
            return Err(ValidationError::InvalidAnalysisDir(format!(
                "analysis_dir must be a single directory name, got '{}'",
                self.analysis_dir
            )));
        }

        self.connection_size_bounds.validate()
    }
}

impl SizeBounds {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(ValidationError::InvalidSizeBounds(
                "bounds must be finite".to_string(),
            ));
        }
        if self.lower < 0.0 {
            return Err(ValidationError::InvalidSizeBounds(format!(
                "lower bound {} is negative",
                self.lower
            )));
        }
        if self.lower > self.upper {
            return Err(ValidationError::InvalidSizeBounds(format!(
                "lower bound {} exceeds upper bound {}",
                self.lower, self.upper
            )));
        }
        Ok(())
    }

    pub fn contains(&self, size: f64) -> bool {
        self.lower <= size && size <= self.upper
    }

    /// Whether these are the bounds of the default invocation
    pub fn is_default(&self) -> bool {
        *self == SizeBounds::default()
    }
}
