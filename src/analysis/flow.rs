//! Flow statistics: throughput and path length distributions.

use std::collections::HashSet;

use super::calculator::StatisticsCalculator;
use super::distribution::{ColumnScale, Distribution};
use super::log_parser::LogRecord;
use super::types::{FlowRecord, StatisticsReport};

#[derive(Debug, Default)]
pub struct FlowStatistics {
    source_ids: HashSet<u64>,
    target_ids: HashSet<u64>,
    avg_throughput: Vec<f64>,
    path_lengths: Vec<f64>,
}

impl FlowStatistics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatisticsCalculator for FlowStatistics {
    type Record = FlowRecord;

    fn report_file_name(&self) -> String {
        format!("{}.statistics", FlowRecord::FILE_STEM)
    }

    fn accumulate(&mut self, record: FlowRecord) {
        self.source_ids.insert(record.source_id);
        self.target_ids.insert(record.target_id);
        self.path_lengths.push(record.path_length() as f64);
        self.avg_throughput.push(record.avg_throughput);
    }

    fn finish(self) -> StatisticsReport {
        let mut report = StatisticsReport::new();
        report.insert("all_num_flows", self.avg_throughput.len());

        let (Some(throughput), Some(path_length)) = (
            Distribution::from_values(&self.avg_throughput),
            Distribution::from_values(&self.path_lengths),
        ) else {
            return report;
        };

        report.insert("all_flow_num_unique_sources", self.source_ids.len());
        report.insert("all_flow_num_unique_targets", self.target_ids.len());
        throughput.record(&mut report, "all_flow_avg_throughput", ColumnScale::Real, false);
        path_length.record(&mut report, "all_flow_path_length", ColumnScale::Integer, false);
        report
    }
}
