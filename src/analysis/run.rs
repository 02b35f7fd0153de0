//! Per-run analysis: one pass of each entity calculator over a run directory.

use std::path::Path;

use log::info;
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};

use super::calculator::{calculate, StatisticsCalculator};
use super::connection::ConnectionStatistics;
use super::flow::FlowStatistics;
use super::link::LinkStatistics;
use super::log_parser::{read_log, resolve_log_path, LogRecord};
use super::node::NodeStatistics;
use super::report::write_report;
use super::types::StatisticsReport;

/// The four reports of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReports {
    pub flow: StatisticsReport,
    pub connection: StatisticsReport,
    pub link: StatisticsReport,
    pub node: StatisticsReport,
}

/// Read one entity log, reduce it and write its report
pub fn run_calculator<C: StatisticsCalculator>(
    calculator: C,
    run_dir: &Path,
    analysis_dir: &Path,
) -> Result<StatisticsReport> {
    let log_path = resolve_log_path(run_dir, <C::Record as LogRecord>::FILE_STEM)?;

    info!("Reading in {} log file {}...", <C::Record as LogRecord>::FILE_STEM, log_path.display());
    let records = read_log::<C::Record>(&log_path)?;

    info!("Calculating statistics...");
    let report_path = analysis_dir.join(calculator.report_file_name());
    let report = calculate(calculator, records);

    write_report(&report, &report_path)?;
    Ok(report)
}

/// Analyze a run directory: flows, connections, links, then nodes.
///
/// Stops at the first failing calculator; reports already written stay on disk.
pub fn analyze_run(run_dir: &Path, config: &AnalysisConfig) -> Result<RunReports> {
    if !run_dir.is_dir() {
        return Err(AnalysisError::Usage(format!(
            "The run folder path does not exist: {}",
            run_dir.display()
        )));
    }

    let analysis_dir = run_dir.join(&config.analysis_dir);
    info!("Analyzing run {}", run_dir.display());

    let flow = run_calculator(FlowStatistics::new(), run_dir, &analysis_dir)?;
    let connection = run_calculator(
        ConnectionStatistics::new(config.connection_size_bounds),
        run_dir,
        &analysis_dir,
    )?;
    let link = run_calculator(LinkStatistics::new(), run_dir, &analysis_dir)?;
    let node = run_calculator(NodeStatistics::new(), run_dir, &analysis_dir)?;

    info!("Analysis of {} complete", run_dir.display());
    Ok(RunReports {
        flow,
        connection,
        link,
        node,
    })
}
