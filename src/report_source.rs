use anyhow::Result;

use crate::data::row::RowRecord;
use crate::filter::FilterState;

/// Where the dashboard gets its report rows from.
/// This lets the dashboard run without knowing about HTTP.
pub trait ReportSource {
    /// Fetch the report for a filter. `Ok(None)` means the source had no rows
    /// and the display should stay as it is.
    fn fetch_report(&self, filter: &FilterState) -> Result<Option<Vec<RowRecord>>>;

    /// Raw response body for the same request, used to diagnose a failed fetch
    fn raw_response(&self, filter: &FilterState) -> Result<String>;

    /// Human-readable description of the source
    fn describe(&self) -> String;
}
