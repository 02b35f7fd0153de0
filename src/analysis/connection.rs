//! Connection statistics over two populations.
//!
//! The "all" block covers every connection inside the size bounds. The
//! "completed" block is restricted to connections that finished, and only
//! exists when at least one did.

use std::collections::HashSet;

use super::calculator::StatisticsCalculator;
use super::distribution::{ColumnScale, Distribution};
use super::log_parser::LogRecord;
use super::types::{ConnectionRecord, StatisticsReport};
use crate::config::SizeBounds;

#[derive(Debug)]
pub struct ConnectionStatistics {
    bounds: SizeBounds,
    source_ids: HashSet<u64>,
    target_ids: HashSet<u64>,
    throughput: Vec<f64>,
    num_flows: Vec<f64>,
    completion_times: Vec<f64>,
    completed_throughput: Vec<f64>,
}

/// Statistics over every accumulated connection
#[derive(Debug, Clone, PartialEq)]
pub struct AllConnections {
    pub num_connections: usize,
    pub num_completed: usize,
    pub num_incomplete: usize,
    pub num_unique_sources: usize,
    pub num_unique_targets: usize,
    pub throughput: Distribution,
    pub num_flows: Distribution,
}

impl AllConnections {
    pub fn fraction_completed(&self) -> f64 {
        self.num_completed as f64 / self.num_connections as f64
    }
}

/// Statistics restricted to connections whose completed flag is set
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedConnections {
    pub completion_time: Distribution,
    pub throughput: Distribution,
}

/// Reduced connection statistics for a non-empty connection log
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSummary {
    pub all: AllConnections,
    /// `None` when no connection completed
    pub completed: Option<CompletedConnections>,
}

impl ConnectionStatistics {
    pub fn new(bounds: SizeBounds) -> Self {
        Self {
            bounds,
            source_ids: HashSet::new(),
            target_ids: HashSet::new(),
            throughput: Vec::new(),
            num_flows: Vec::new(),
            completion_times: Vec::new(),
            completed_throughput: Vec::new(),
        }
    }

    pub fn num_connections(&self) -> usize {
        self.throughput.len()
    }

    /// Reduce the accumulated columns; `None` if no connection was accumulated
    pub fn summarize(&self) -> Option<ConnectionSummary> {
        let num_connections = self.num_connections();
        let num_completed = self.completion_times.len();

        let all = AllConnections {
            num_connections,
            num_completed,
            num_incomplete: num_connections - num_completed,
            num_unique_sources: self.source_ids.len(),
            num_unique_targets: self.target_ids.len(),
            throughput: Distribution::from_values(&self.throughput)?,
            num_flows: Distribution::from_values(&self.num_flows)?,
        };

        let completed = match (
            Distribution::from_values(&self.completion_times),
            Distribution::from_values(&self.completed_throughput),
        ) {
            (Some(completion_time), Some(throughput)) => Some(CompletedConnections {
                completion_time,
                throughput,
            }),
            _ => None,
        };

        Some(ConnectionSummary { all, completed })
    }
}

impl Default for ConnectionStatistics {
    fn default() -> Self {
        Self::new(SizeBounds::default())
    }
}

impl ConnectionSummary {
    pub fn to_report(&self) -> StatisticsReport {
        let mut report = StatisticsReport::new();
        let all = &self.all;

        report.insert("all_num_connections", all.num_connections);
        report.insert("all_num_connections_completed", all.num_completed);
        report.insert("all_num_connections_incomplete", all.num_incomplete);
        report.insert("all_num_connections_fraction_completed", all.fraction_completed());
        report.insert("all_connection_num_unique_sources", all.num_unique_sources);
        report.insert("all_connection_num_unique_targets", all.num_unique_targets);
        all.throughput
            .record(&mut report, "all_connection_throughput", ColumnScale::Real, false);
        all.num_flows
            .record(&mut report, "all_connection_num_flows", ColumnScale::Integer, false);

        if let Some(completed) = &self.completed {
            completed.completion_time.record(
                &mut report,
                "completed_connection_completion_time",
                ColumnScale::Integer,
                false,
            );
            completed.throughput.record(
                &mut report,
                "completed_connection_throughput",
                ColumnScale::Real,
                false,
            );
        }

        report
    }
}

impl StatisticsCalculator for ConnectionStatistics {
    type Record = ConnectionRecord;

    fn report_file_name(&self) -> String {
        if self.bounds.is_default() {
            format!("{}.statistics", ConnectionRecord::FILE_STEM)
        } else {
            format!(
                "{}_lb_{}_ub_{}.statistics",
                ConnectionRecord::FILE_STEM,
                self.bounds.lower,
                self.bounds.upper
            )
        }
    }

    fn accumulate(&mut self, record: ConnectionRecord) {
        if !self.bounds.contains(record.total_size) {
            return;
        }

        self.source_ids.insert(record.source_id);
        self.target_ids.insert(record.target_id);
        self.throughput.push(record.avg_throughput);
        self.num_flows.push(record.flow_ids.len() as f64);
        if record.completed {
            self.completion_times.push(record.duration as f64);
            self.completed_throughput.push(record.avg_throughput);
        }
    }

    fn finish(self) -> StatisticsReport {
        match self.summarize() {
            Some(summary) => summary.to_report(),
            None => {
                let mut report = StatisticsReport::new();
                report.insert("all_num_connections", 0usize);
                report
            }
        }
    }
}
