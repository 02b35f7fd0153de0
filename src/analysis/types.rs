//! Core data types for log ingestion and statistics.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::log_parser::{ColumnKind, Fields, LogRecord, RecordError};

/// Simulation time in the simulator's integer time units
pub type SimTime = u64;

/// Character separating consecutive hops in a flow path string (`a-[7]->b`)
pub const PATH_HOP_SEPARATOR: char = '>';

/// Separator of the owning flow identifiers of a connection (`3;4;5`)
pub const FLOW_ID_SEPARATOR: char = ';';

/// Completed-flag tokens of the connection log
pub const COMPLETED_TRUE: &str = "T";
pub const COMPLETED_FALSE: &str = "F";

/// Number of hop separators in a path string.
///
/// A string without separators is a direct path of length 0.
pub fn path_length(path: &str) -> usize {
    path.matches(PATH_HOP_SEPARATOR).count()
}

/// One line of `flow_info.csv`
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRecord {
    pub flow_id: u64,
    pub source_id: u64,
    pub target_id: u64,
    pub path: String,
    pub start_time: SimTime,
    pub end_time: SimTime,
    pub duration: SimTime,
    pub total_sent: f64,
    pub avg_throughput: f64,
    pub metadata: String,
}

impl FlowRecord {
    pub fn path_length(&self) -> usize {
        path_length(&self.path)
    }
}

impl LogRecord for FlowRecord {
    const FILE_STEM: &'static str = "flow_info";
    const SCHEMA: &'static [ColumnKind] = &[
        ColumnKind::Integer, // flow id
        ColumnKind::Integer, // source
        ColumnKind::Integer, // target
        ColumnKind::Text,    // path
        ColumnKind::Integer, // start
        ColumnKind::Integer, // end
        ColumnKind::Integer, // duration
        ColumnKind::Real,    // total sent
        ColumnKind::Real,    // avg throughput
        ColumnKind::Text,    // metadata
    ];

    fn from_fields(mut fields: Fields) -> Result<Self, RecordError> {
        Ok(Self {
            flow_id: fields.integer()?,
            source_id: fields.integer()?,
            target_id: fields.integer()?,
            path: fields.text()?,
            start_time: fields.integer()?,
            end_time: fields.integer()?,
            duration: fields.integer()?,
            total_sent: fields.real()?,
            avg_throughput: fields.real()?,
            metadata: fields.text()?,
        })
    }
}

/// One line of `connection_info.csv`
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionRecord {
    pub connection_id: u64,
    pub source_id: u64,
    pub target_id: u64,
    pub total_size: f64,
    pub total_sent: f64,
    pub flow_ids: Vec<u64>,
    pub start_time: SimTime,
    pub end_time: SimTime,
    pub duration: SimTime,
    pub avg_throughput: f64,
    pub completed: bool,
    pub metadata: String,
}

impl LogRecord for ConnectionRecord {
    const FILE_STEM: &'static str = "connection_info";
    const SCHEMA: &'static [ColumnKind] = &[
        ColumnKind::Integer, // connection id
        ColumnKind::Integer, // source
        ColumnKind::Integer, // target
        ColumnKind::Real,    // total size
        ColumnKind::Real,    // total sent
        ColumnKind::Text,    // flow ids
        ColumnKind::Integer, // start
        ColumnKind::Integer, // end
        ColumnKind::Integer, // duration
        ColumnKind::Real,    // avg throughput
        ColumnKind::Text,    // completed flag
        ColumnKind::Text,    // metadata
    ];

    fn from_fields(mut fields: Fields) -> Result<Self, RecordError> {
        Ok(Self {
            connection_id: fields.integer()?,
            source_id: fields.integer()?,
            target_id: fields.integer()?,
            total_size: fields.real()?,
            total_sent: fields.real()?,
            flow_ids: parse_flow_ids(&fields.text()?)?,
            start_time: fields.integer()?,
            end_time: fields.integer()?,
            duration: fields.integer()?,
            avg_throughput: fields.real()?,
            completed: parse_completed(&fields.text()?)?,
            metadata: fields.text()?,
        })
    }
}

fn parse_flow_ids(raw: &str) -> Result<Vec<u64>, RecordError> {
    if raw.is_empty() {
        return Err(RecordError::Violation(
            "connection has no owning flow identifiers".to_string(),
        ));
    }
    raw.split(FLOW_ID_SEPARATOR)
        .map(|id| {
            id.parse::<u64>().map_err(|_| {
                RecordError::Violation(format!("'{}' in flow id list '{}' is not a flow identifier", id, raw))
            })
        })
        .collect()
}

fn parse_completed(raw: &str) -> Result<bool, RecordError> {
    match raw {
        COMPLETED_TRUE => Ok(true),
        COMPLETED_FALSE => Ok(false),
        other => Err(RecordError::InvalidEnum {
            column: "completed",
            value: other.to_string(),
        }),
    }
}

/// One line of `link_info.csv`
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRecord {
    pub link_id: u64,
    pub source_id: u64,
    pub target_id: u64,
    pub start_time: SimTime,
    pub end_time: SimTime,
    pub duration: SimTime,
    /// Fraction of capacity used on average, conventionally in [0, 1]
    pub avg_utilization: f64,
    pub avg_active_flows: f64,
    pub metadata: String,
}

impl LogRecord for LinkRecord {
    const FILE_STEM: &'static str = "link_info";
    const SCHEMA: &'static [ColumnKind] = &[
        ColumnKind::Integer, // link id
        ColumnKind::Integer, // source
        ColumnKind::Integer, // target
        ColumnKind::Integer, // start
        ColumnKind::Integer, // end
        ColumnKind::Integer, // duration
        ColumnKind::Real,    // avg utilization
        ColumnKind::Real,    // avg active flows
        ColumnKind::Text,    // metadata
    ];

    fn from_fields(mut fields: Fields) -> Result<Self, RecordError> {
        Ok(Self {
            link_id: fields.integer()?,
            source_id: fields.integer()?,
            target_id: fields.integer()?,
            start_time: fields.integer()?,
            end_time: fields.integer()?,
            duration: fields.integer()?,
            avg_utilization: fields.real()?,
            avg_active_flows: fields.real()?,
            metadata: fields.text()?,
        })
    }
}

/// One line of `node_info.csv`
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub node_id: u64,
    pub avg_active_flows: f64,
    pub metadata: String,
}

impl LogRecord for NodeRecord {
    const FILE_STEM: &'static str = "node_info";
    const SCHEMA: &'static [ColumnKind] = &[
        ColumnKind::Integer, // node id
        ColumnKind::Real,    // avg active flows
        ColumnKind::Text,    // metadata
    ];

    fn from_fields(mut fields: Fields) -> Result<Self, RecordError> {
        Ok(Self {
            node_id: fields.integer()?,
            avg_active_flows: fields.real()?,
            metadata: fields.text()?,
        })
    }
}

/// A single statistic value.
///
/// Counts and extremes of integer columns stay integral so that reports
/// print `3` rather than `3.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Integer(u64),
    Real(f64),
}

impl From<usize> for StatValue {
    fn from(v: usize) -> Self {
        StatValue::Integer(v as u64)
    }
}

impl From<f64> for StatValue {
    fn from(v: f64) -> Self {
        StatValue::Real(v)
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Integer(v) => write!(f, "{}", v),
            // Debug keeps the fractional part of whole floats ("4.0")
            StatValue::Real(v) => write!(f, "{:?}", v),
        }
    }
}

impl FromStr for StatValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(v) = s.parse::<u64>() {
            return Ok(StatValue::Integer(v));
        }
        s.parse::<f64>()
            .map(StatValue::Real)
            .map_err(|_| format!("'{}' is not a statistic value", s))
    }
}

/// Flat mapping of statistic name to value, iterated in sorted key order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatisticsReport {
    entries: BTreeMap<String, StatValue>,
}

impl StatisticsReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StatValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<StatValue> {
        self.entries.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, StatValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_length() {
        assert_eq!(path_length("35"), 0);
        assert_eq!(path_length("35-[11]->4"), 1);
        assert_eq!(path_length("35-[11]->4-[22]->99-[77]->33"), 3);
    }

    #[test]
    fn test_stat_value_display() {
        assert_eq!(StatValue::Integer(3).to_string(), "3");
        assert_eq!(StatValue::Real(4.0).to_string(), "4.0");
        assert_eq!(StatValue::Real(0.5).to_string(), "0.5");
        assert_eq!(StatValue::Real(1e20).to_string(), "1e20");
    }

    #[test]
    fn test_stat_value_parse() {
        assert_eq!("100".parse::<StatValue>(), Ok(StatValue::Integer(100)));
        assert_eq!("4.0".parse::<StatValue>(), Ok(StatValue::Real(4.0)));
        assert_eq!("1e20".parse::<StatValue>(), Ok(StatValue::Real(1e20)));
        assert!("abc".parse::<StatValue>().is_err());
    }

    #[test]
    fn test_report_iterates_sorted() {
        let mut report = StatisticsReport::new();
        report.insert("b_key", 2usize);
        report.insert("a_key", 1.5);
        report.insert("a_key_99.9th", 1.0);
        report.insert("a_key_99th", 1.0);

        let keys: Vec<&str> = report.keys().collect();
        assert_eq!(keys, vec!["a_key", "a_key_99.9th", "a_key_99th", "b_key"]);
        assert_eq!(report.get("a_key"), Some(StatValue::Real(1.5)));
    }
}
