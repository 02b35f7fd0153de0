//! Link statistics: utilization and active-flow distributions.

use std::collections::HashSet;

use super::calculator::StatisticsCalculator;
use super::distribution::{ColumnScale, Distribution};
use super::log_parser::LogRecord;
use super::types::{LinkRecord, StatisticsReport};

#[derive(Debug, Default)]
pub struct LinkStatistics {
    source_ids: HashSet<u64>,
    target_ids: HashSet<u64>,
    avg_utilization: Vec<f64>,
    avg_active_flows: Vec<f64>,
    num_inactive: usize,
}

impl LinkStatistics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatisticsCalculator for LinkStatistics {
    type Record = LinkRecord;

    fn report_file_name(&self) -> String {
        format!("{}.statistics", LinkRecord::FILE_STEM)
    }

    fn accumulate(&mut self, record: LinkRecord) {
        self.source_ids.insert(record.source_id);
        self.target_ids.insert(record.target_id);
        // A link that never carried traffic is inactive
        if record.avg_utilization == 0.0 {
            self.num_inactive += 1;
        }
        self.avg_utilization.push(record.avg_utilization);
        self.avg_active_flows.push(record.avg_active_flows);
    }

    fn finish(self) -> StatisticsReport {
        let num_links = self.avg_utilization.len();
        let mut report = StatisticsReport::new();
        report.insert("all_num_links", num_links);

        let (Some(utilization), Some(active_flows)) = (
            Distribution::from_values(&self.avg_utilization),
            Distribution::from_values(&self.avg_active_flows),
        ) else {
            return report;
        };

        report.insert("all_num_links_active", num_links - self.num_inactive);
        report.insert("all_num_links_inactive", self.num_inactive);
        report.insert("all_link_num_unique_sources", self.source_ids.len());
        report.insert("all_link_num_unique_targets", self.target_ids.len());
        utilization.record(&mut report, "all_link_avg_utilization", ColumnScale::Real, true);
        active_flows.record(&mut report, "all_link_avg_num_active_flows", ColumnScale::Real, true);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::calculator::calculate;
    use crate::analysis::types::StatValue;

    fn link(id: u64, utilization: f64, active_flows: f64) -> LinkRecord {
        LinkRecord {
            link_id: id,
            source_id: id,
            target_id: id + 1,
            start_time: 0,
            end_time: 1000,
            duration: 1000,
            avg_utilization: utilization,
            avg_active_flows: active_flows,
            metadata: String::new(),
        }
    }

    #[test]
    fn test_empty_link_log() {
        let report = calculate(LinkStatistics::new(), Vec::new());
        assert_eq!(report.len(), 1);
        assert_eq!(report.get("all_num_links"), Some(StatValue::Integer(0)));
    }

    #[test]
    fn test_activity_classification() {
        let report = calculate(
            LinkStatistics::new(),
            vec![link(0, 0.0, 0.0), link(1, 0.5, 1.0), link(2, 1.0, 2.0), link(3, 0.0, 0.0)],
        );

        assert_eq!(report.get("all_num_links"), Some(StatValue::Integer(4)));
        assert_eq!(report.get("all_num_links_active"), Some(StatValue::Integer(2)));
        assert_eq!(report.get("all_num_links_inactive"), Some(StatValue::Integer(2)));
        assert_eq!(report.get("all_link_num_unique_sources"), Some(StatValue::Integer(4)));
        assert_eq!(report.get("all_link_avg_utilization_mean"), Some(StatValue::Real(0.375)));
        assert_eq!(report.get("all_link_avg_utilization_median"), Some(StatValue::Real(0.25)));
        assert!(report.contains_key("all_link_avg_utilization_std"));
        assert!(report.contains_key("all_link_avg_num_active_flows_std"));
    }

    #[test]
    fn test_tiny_utilization_is_active() {
        let report = calculate(LinkStatistics::new(), vec![link(0, 1e-12, 0.0)]);
        assert_eq!(report.get("all_num_links_active"), Some(StatValue::Integer(1)));
        assert_eq!(report.get("all_num_links_inactive"), Some(StatValue::Integer(0)));
    }
}
