//! Report serialization.
//!
//! Reports are `key=value` lines sorted by key, so identical statistics
//! always produce byte-identical files.

use std::fs;
use std::path::Path;

use crate::error::{AnalysisError, Result};

use super::types::{StatValue, StatisticsReport};

/// Render a report as sorted `key=value` lines
pub fn render_report(report: &StatisticsReport) -> String {
    let mut content = String::new();
    for (key, value) in report.iter() {
        content.push_str(key);
        content.push('=');
        content.push_str(&value.to_string());
        content.push('\n');
    }
    content
}

/// Write a report, creating the destination directory and replacing any previous file
pub fn write_report(report: &StatisticsReport, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| AnalysisError::io(parent, e))?;
    }

    log::info!("Writing {} statistics to result file {}...", report.len(), output_path.display());
    fs::write(output_path, render_report(report)).map_err(|e| AnalysisError::io(output_path, e))?;
    Ok(())
}

/// Parse `key=value` lines back into a report
pub fn parse_report(content: &str) -> std::result::Result<StatisticsReport, (usize, String)> {
    let mut report = StatisticsReport::new();
    for (index, line) in content.lines().enumerate() {
        let (key, raw) = line
            .split_once('=')
            .ok_or_else(|| (index + 1, format!("'{}' is not a key=value line", line)))?;
        let value: StatValue = raw.parse().map_err(|reason| (index + 1, reason))?;
        report.insert(key, value);
    }
    Ok(report)
}

/// Read a report file written by [`write_report`]
pub fn read_report(path: &Path) -> Result<StatisticsReport> {
    let content = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    parse_report(&content).map_err(|(line, reason)| AnalysisError::SchemaViolation {
        path: path.to_path_buf(),
        line,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_report() -> StatisticsReport {
        let mut report = StatisticsReport::new();
        report.insert("all_num_flows", 3usize);
        report.insert("all_flow_avg_throughput_mean", 4.0);
        report.insert("all_flow_avg_throughput_99.9th", 5.996);
        report.insert("all_flow_path_length_min", 1usize);
        report
    }

    #[test]
    fn test_render_is_sorted() {
        let content = render_report(&sample_report());
        assert_eq!(
            content,
            "all_flow_avg_throughput_99.9th=5.996\n\
             all_flow_avg_throughput_mean=4.0\n\
             all_flow_path_length_min=1\n\
             all_num_flows=3\n"
        );
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("analysis").join("flow_info.statistics");
        let report = sample_report();

        write_report(&report, &path).unwrap();
        let read_back = read_report(&path).unwrap();
        assert_eq!(read_back, report);

        let content = fs::read_to_string(&path).unwrap();
        let keys: Vec<&str> = content.lines().filter_map(|l| l.split('=').next()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_write_overwrites_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("node_info.statistics");
        fs::write(&path, "stale=1\nother=2\n").unwrap();

        let mut report = StatisticsReport::new();
        report.insert("all_num_nodes", 0usize);
        write_report(&report, &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "all_num_nodes=0\n");
    }

    #[test]
    fn test_identical_reports_are_byte_identical() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.statistics");
        let b = dir.path().join("b.statistics");
        write_report(&sample_report(), &a).unwrap();
        write_report(&sample_report(), &b).unwrap();
        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed_line() {
        assert_eq!(parse_report("a=1\nnonsense\n").unwrap_err().0, 2);
        assert!(parse_report("a=x\n").is_err());
    }
}
