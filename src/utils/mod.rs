//! Shared utilities: command-line argument validation.

pub mod validation;

pub use validation::{parse_existing_dir, parse_worker_count};
