use anyhow::Result;
use tracing::{error, info, warn};

use crate::columns::controller::{ColumnChange, ColumnSetController};
use crate::filter::{DatePicker, FilterState, TextDatePicker};
use crate::grid::GridApi;
use crate::panel::{ControlPanel, Notifier};
use crate::report_source::ReportSource;

/// What a fetch did to the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Columns and rows were replaced
    Updated { rows: usize },
    /// The source returned no rows; display unchanged
    NoData,
    /// The date range was incomplete, nothing was requested
    Skipped,
    /// The request failed; display unchanged
    Failed,
}

/// One dashboard session: the report source, the date pickers and currency
/// toggle, and the column controller that owns the grid.
pub struct Dashboard<G, P, N> {
    source: Box<dyn ReportSource>,
    controller: ColumnSetController<G, P, N>,
    start_picker: TextDatePicker,
    end_picker: TextDatePicker,
    include_currency: bool,
}

impl<G: GridApi, P: ControlPanel, N: Notifier> Dashboard<G, P, N> {
    pub fn new(
        source: Box<dyn ReportSource>,
        controller: ColumnSetController<G, P, N>,
        include_currency: bool,
    ) -> Self {
        Self {
            source,
            controller,
            start_picker: TextDatePicker::new(),
            end_picker: TextDatePicker::new(),
            include_currency,
        }
    }

    /// Initial load: whatever range the server defaults to
    pub fn bootstrap(&mut self) -> FetchOutcome {
        info!(target: "fetch", "Loading initial report from {}", self.source.describe());
        let filter = FilterState::new(None, None, self.include_currency);
        self.fetch(&filter)
    }

    /// Set the date pickers. Both must parse or neither changes.
    pub fn set_date_range(&mut self, start: &str, end: &str) -> Result<()> {
        let mut start_picker = self.start_picker.clone();
        let mut end_picker = self.end_picker.clone();
        start_picker.set(start)?;
        end_picker.set(end)?;
        self.start_picker = start_picker;
        self.end_picker = end_picker;
        Ok(())
    }

    /// The date-filter button: fetch only when both dates are selected
    pub fn apply_date_filter(&mut self) -> FetchOutcome {
        let filter = self.current_filter();
        if !filter.has_date_range() {
            warn!(target: "fetch", "Date filter needs both a start and an end date");
            return FetchOutcome::Skipped;
        }
        self.fetch(&filter)
    }

    /// The currency toggle: always refetches with whatever dates are selected
    pub fn set_include_currency(&mut self, include_currency: bool) -> FetchOutcome {
        self.include_currency = include_currency;
        let filter = self.current_filter();
        self.fetch(&filter)
    }

    /// Refetch with the current filter values
    pub fn refresh(&mut self) -> FetchOutcome {
        let filter = self.current_filter();
        self.fetch(&filter)
    }

    pub fn current_filter(&self) -> FilterState {
        FilterState::from_pickers(&self.start_picker, &self.end_picker, self.include_currency)
    }

    fn fetch(&mut self, filter: &FilterState) -> FetchOutcome {
        match self.source.fetch_report(filter) {
            Ok(Some(rows)) => {
                let count = rows.len();
                // Non-empty is guaranteed by the source contract
                if let Some(sample) = rows.first() {
                    self.controller
                        .set_columns_from_fetch(sample, filter.include_currency);
                }
                self.controller.grid_mut().set_row_data(rows);
                info!(target: "fetch", "Loaded {} rows", count);
                FetchOutcome::Updated { rows: count }
            }
            Ok(None) => {
                info!(target: "fetch", "Report returned no rows; keeping current display");
                FetchOutcome::NoData
            }
            Err(e) => {
                error!(target: "fetch", "Error fetching data: {:#}", e);
                match self.source.raw_response(filter) {
                    Ok(text) => info!(target: "fetch", "Response was: {}", text),
                    Err(e) => error!(target: "fetch", "Could not re-read response: {:#}", e),
                }
                FetchOutcome::Failed
            }
        }
    }

    pub fn add_column(&mut self, identifier: &str) -> ColumnChange {
        self.controller.add_column(identifier)
    }

    pub fn remove_column(&mut self, identifier: &str) -> ColumnChange {
        self.controller.remove_column(identifier)
    }

    pub fn include_currency(&self) -> bool {
        self.include_currency
    }

    pub fn date_range(&self) -> (Option<String>, Option<String>) {
        (
            self.start_picker.selected_date(),
            self.end_picker.selected_date(),
        )
    }

    pub fn controller(&self) -> &ColumnSetController<G, P, N> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ColumnSetController<G, P, N> {
        &mut self.controller
    }
}
