//! Statistics over the info logs of a single simulation run.
//!
//! This module reads the flow, connection, link and node logs against their
//! fixed schemas, reduces each family to a flat statistics report and writes
//! the reports as sorted `key=value` files.

pub mod types;
pub mod log_parser;
pub mod distribution;
pub mod calculator;
pub mod flow;
pub mod connection;
pub mod link;
pub mod node;
pub mod report;
pub mod run;

pub use types::*;
pub use log_parser::{read_log, read_rows, resolve_log_path, ColumnKind, Field, LogRecord};
pub use calculator::{calculate, StatisticsCalculator};
pub use connection::{ConnectionStatistics, ConnectionSummary};
pub use flow::FlowStatistics;
pub use link::LinkStatistics;
pub use node::NodeStatistics;
pub use report::{read_report, render_report, write_report};
pub use run::{analyze_run, RunReports};
