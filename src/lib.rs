//! # floodns-analysis - Statistics for floodns network-flow simulation runs
//!
//! This library post-processes the info logs written by the floodns
//! simulator. Each run directory holds one log per entity family (flows,
//! connections, links, nodes); the library validates every line against the
//! family's fixed schema, reduces the columns to summary statistics and
//! writes them as sorted `key=value` reports.
//!
//! ## Architecture
//!
//! - `analysis`: schema-checked log reader, the four statistics calculators,
//!   report writer and the per-run driver
//! - `orchestrator`: batch analysis of a collection of runs on a worker pool,
//!   one isolated process per run
//! - `config` / `config_loader`: optional YAML configuration
//! - `error`: the error taxonomy shared by all of the above
//! - `utils`: command-line argument validation
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use floodns_analysis::{analysis, config::AnalysisConfig};
//!
//! let reports = analysis::analyze_run(Path::new("runs/run_0"), &AnalysisConfig::default())?;
//! println!("{:?}", reports.flow.get("all_num_flows"));
//!
//! // runs/run_0/analysis now contains:
//! // - flow_info.statistics
//! // - connection_info.statistics
//! // - link_info.statistics
//! // - node_info.statistics
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`error::AnalysisError`]; the binaries wrap it in
//! `color_eyre` reports.

pub mod error;
pub mod config;
pub mod config_loader;
pub mod analysis;
pub mod orchestrator;
pub mod utils;
