//! Two-phase statistics calculation shared by all entity families.

use super::log_parser::LogRecord;
use super::types::StatisticsReport;

/// Accumulates one entity family's records, then reduces them to a report
pub trait StatisticsCalculator {
    type Record: LogRecord;

    /// Name of the report file inside the analysis directory
    fn report_file_name(&self) -> String;

    fn accumulate(&mut self, record: Self::Record);

    /// Reduce the accumulated columns; an empty input yields only the count
    fn finish(self) -> StatisticsReport;
}

/// Feed every record to a calculator and reduce
pub fn calculate<C, I>(mut calculator: C, records: I) -> StatisticsReport
where
    C: StatisticsCalculator,
    I: IntoIterator<Item = C::Record>,
{
    for record in records {
        calculator.accumulate(record);
    }
    calculator.finish()
}
