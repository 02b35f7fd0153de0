//! Node statistics: active-flow distribution and activity counts.

use super::calculator::StatisticsCalculator;
use super::distribution::{ColumnScale, Distribution};
use super::log_parser::LogRecord;
use super::types::{NodeRecord, StatisticsReport};

#[derive(Debug, Default)]
pub struct NodeStatistics {
    avg_active_flows: Vec<f64>,
    num_inactive: usize,
}

impl NodeStatistics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatisticsCalculator for NodeStatistics {
    type Record = NodeRecord;

    fn report_file_name(&self) -> String {
        format!("{}.statistics", NodeRecord::FILE_STEM)
    }

    fn accumulate(&mut self, record: NodeRecord) {
        if record.avg_active_flows == 0.0 {
            self.num_inactive += 1;
        }
        self.avg_active_flows.push(record.avg_active_flows);
    }

    fn finish(self) -> StatisticsReport {
        let num_nodes = self.avg_active_flows.len();
        let mut report = StatisticsReport::new();
        report.insert("all_num_nodes", num_nodes);

        let Some(active_flows) = Distribution::from_values(&self.avg_active_flows) else {
            return report;
        };

        report.insert("all_num_nodes_active", num_nodes - self.num_inactive);
        report.insert("all_num_nodes_inactive", self.num_inactive);
        active_flows.record(&mut report, "all_node_avg_num_active_flows", ColumnScale::Real, true);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::calculator::calculate;
    use crate::analysis::types::StatValue;

    fn node(id: u64, active_flows: f64) -> NodeRecord {
        NodeRecord {
            node_id: id,
            avg_active_flows: active_flows,
            metadata: String::new(),
        }
    }

    #[test]
    fn test_empty_node_log() {
        let report = calculate(NodeStatistics::new(), Vec::new());
        assert_eq!(report.len(), 1);
        assert_eq!(report.get("all_num_nodes"), Some(StatValue::Integer(0)));
    }

    #[test]
    fn test_node_statistics() {
        let report = calculate(
            NodeStatistics::new(),
            vec![node(0, 0.0), node(1, 3.0), node(2, 1.0)],
        );
        assert_eq!(report.get("all_num_nodes"), Some(StatValue::Integer(3)));
        assert_eq!(report.get("all_num_nodes_active"), Some(StatValue::Integer(2)));
        assert_eq!(report.get("all_num_nodes_inactive"), Some(StatValue::Integer(1)));
        assert_eq!(report.get("all_node_avg_num_active_flows_min"), Some(StatValue::Real(0.0)));
        assert_eq!(report.get("all_node_avg_num_active_flows_max"), Some(StatValue::Real(3.0)));
        assert_eq!(report.get("all_node_avg_num_active_flows_median"), Some(StatValue::Real(1.0)));
        assert_eq!(report.get("all_node_avg_num_active_flows_total"), Some(StatValue::Real(4.0)));
    }
}
