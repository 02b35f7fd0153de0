//! Reduction of a numeric column to summary statistics.
//!
//! Order statistics use linear interpolation at rank `p/100 * (n - 1)`, the
//! same scheme numpy's default `percentile` uses, so reports stay comparable
//! with historical ones.

use std::cmp::Ordering;

use super::types::{StatValue, StatisticsReport};

/// Percentiles reported for every distribution, with their key suffixes
pub const REPORTED_PERCENTILES: &[(f64, &str)] = &[
    (0.1, "0.1th"),
    (1.0, "1th"),
    (99.0, "99th"),
    (99.9, "99.9th"),
];

/// Whether a column holds integral values (path lengths, durations) or reals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnScale {
    Integer,
    Real,
}

/// Summary of one non-empty numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub count: usize,
    pub total: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Values at [`REPORTED_PERCENTILES`], in the same order
    pub percentiles: Vec<f64>,
}

impl Distribution {
    /// Reduce a column; `None` for an empty column, which has no defined mean
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let count = values.len();
        let total: f64 = values.iter().sum();
        let mean = total / count as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            total,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            median: median(&sorted),
            std_dev: variance.sqrt(),
            percentiles: REPORTED_PERCENTILES
                .iter()
                .map(|(p, _)| percentile(&sorted, *p))
                .collect(),
        })
    }

    /// Add `<prefix>_<stat>` entries for this distribution to a report.
    ///
    /// Total, min and max of an integer column are written as integers.
    pub fn record(
        &self,
        report: &mut StatisticsReport,
        prefix: &str,
        scale: ColumnScale,
        with_std_dev: bool,
    ) {
        let exact = |v: f64| match scale {
            ColumnScale::Integer => StatValue::Integer(v as u64),
            ColumnScale::Real => StatValue::Real(v),
        };

        report.insert(format!("{}_total", prefix), exact(self.total));
        report.insert(format!("{}_min", prefix), exact(self.min));
        report.insert(format!("{}_max", prefix), exact(self.max));
        report.insert(format!("{}_mean", prefix), self.mean);
        report.insert(format!("{}_median", prefix), self.median);
        if with_std_dev {
            report.insert(format!("{}_std", prefix), self.std_dev);
        }
        for ((_, suffix), value) in REPORTED_PERCENTILES.iter().zip(&self.percentiles) {
            report.insert(format!("{}_{}", prefix, suffix), *value);
        }
    }
}

/// Median of sorted, non-empty values
pub fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Percentile `p` in [0, 100] of sorted, non-empty values, linearly interpolated
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(sorted.len() - 1);
    lerp(sorted[lower], sorted[upper], rank - lower as f64)
}

/// Interpolate from whichever end is nearer, keeping the result inside [a, b]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}
