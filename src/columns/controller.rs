use tracing::{debug, error, info, warn};

use crate::columns::definition::{column_fields, ColumnDef, MergeMode};
use crate::columns::hierarchy::{
    is_hierarchy, is_required_pinned, is_valid_order, rank_of, CURRENCY_COLUMN,
    REQUIRED_PINNED_COLUMNS,
};
use crate::data::row::RowRecord;
use crate::grid::GridApi;
use crate::panel::{ControlPanel, Notifier};

pub const ADD_REJECTED: &str = "Adding this column would result in invalid data aggregation.";
pub const REMOVE_REJECTED: &str = "Removing this column would result in invalid data aggregation.";

/// Result of an add/remove request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnChange {
    /// The new column list was committed
    Applied,
    /// The request broke the hierarchy order; nothing changed
    Rejected(String),
    /// Nothing to do (empty selection, unknown column)
    Ignored,
}

/// Owns the displayed column list and the pool of pinned columns that can be
/// added back, and keeps the grid and control panel in step with them.
pub struct ColumnSetController<G, P, N> {
    columns: Vec<ColumnDef>,
    available: Vec<String>,
    grid: G,
    panel: P,
    notifier: N,
}

impl<G: GridApi, P: ControlPanel, N: Notifier> ColumnSetController<G, P, N> {
    /// Nothing is displayed yet, so every required pinned column is available
    pub fn new(grid: G, panel: P, notifier: N) -> Self {
        Self {
            columns: Vec::new(),
            available: REQUIRED_PINNED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            grid,
            panel,
            notifier,
        }
    }

    /// Derive the column list from one fetched row and replace the display wholesale
    pub fn set_columns_from_fetch(&mut self, sample: &RowRecord, include_currency: bool) {
        let mut columns: Vec<ColumnDef> = REQUIRED_PINNED_COLUMNS
            .iter()
            .filter(|&&id| include_currency || id != CURRENCY_COLUMN)
            .filter(|&&id| sample.contains(id))
            .map(|&id| ColumnDef::pinned(id))
            .collect();

        for field in sample.columns() {
            if !columns.iter().any(|c| c.field == *field) {
                columns.push(ColumnDef::unpinned(field.as_str()));
            }
        }

        self.available = REQUIRED_PINNED_COLUMNS
            .iter()
            .filter(|&&id| !sample.contains(id))
            .map(|id| id.to_string())
            .collect();

        info!(
            target: "columns",
            "Columns from fetch: {} displayed ({} pinned), {} available",
            columns.len(),
            columns.iter().filter(|c| c.is_pinned()).count(),
            self.available.len()
        );

        self.columns = columns;
        self.refresh();
    }

    /// Pin a column from the pool, appended after the current columns.
    /// Added columns do not merge rows.
    pub fn add_column(&mut self, identifier: &str) -> ColumnChange {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return ColumnChange::Ignored;
        }
        if !self.available.iter().any(|c| c == identifier) {
            warn!(target: "columns", "'{}' is not in the available pool", identifier);
            return ColumnChange::Ignored;
        }

        let mut tentative = self.columns.clone();
        tentative.push(ColumnDef::pinned(identifier).with_merge(MergeMode::None));

        if !is_valid_order(&column_fields(&tentative)) {
            warn!(target: "columns", "Rejected add of '{}': breaks hierarchy order", identifier);
            self.notifier.notify(ADD_REJECTED);
            return ColumnChange::Rejected(ADD_REJECTED.to_string());
        }

        self.columns = tentative;
        self.available.retain(|c| c != identifier);
        debug!(target: "columns", "Added column '{}'", identifier);
        self.refresh();
        ColumnChange::Applied
    }

    /// Drop a displayed column; required pinned columns go back to the pool
    pub fn remove_column(&mut self, identifier: &str) -> ColumnChange {
        let identifier = identifier.trim();
        if !self.columns.iter().any(|c| c.field == identifier) {
            warn!(target: "columns", "'{}' is not displayed", identifier);
            return ColumnChange::Ignored;
        }

        let tentative: Vec<ColumnDef> = self
            .columns
            .iter()
            .filter(|c| c.field != identifier)
            .cloned()
            .collect();

        // Removal only shrinks the projection, but the rule is checked all the same
        if !is_valid_order(&column_fields(&tentative)) {
            warn!(target: "columns", "Rejected removal of '{}'", identifier);
            self.notifier.notify(REMOVE_REJECTED);
            return ColumnChange::Rejected(REMOVE_REJECTED.to_string());
        }

        self.columns = tentative;
        if is_required_pinned(identifier) {
            self.return_to_pool(identifier);
        }
        debug!(target: "columns", "Removed column '{}'", identifier);
        self.refresh();
        ColumnChange::Applied
    }

    // Pool stays in rank order
    fn return_to_pool(&mut self, identifier: &str) {
        if self.available.iter().any(|c| c == identifier) {
            return;
        }
        let rank = rank_of(identifier);
        let pos = self
            .available
            .iter()
            .position(|c| rank_of(c) > rank)
            .unwrap_or(self.available.len());
        self.available.insert(pos, identifier.to_string());
    }

    fn refresh(&mut self) {
        self.grid.set_column_defs(self.columns.clone());
        self.refresh_panel();
    }

    /// Push the active hierarchy columns and the pool to the control panel.
    /// Panel failures are logged and skipped.
    pub fn refresh_panel(&mut self) {
        let active = self.pinned_hierarchy_columns();
        if let Err(e) = self.panel.show_active_columns(&active) {
            error!(target: "panel", "Failed to update active columns: {}", e);
        }
        if let Err(e) = self.panel.show_available_columns(&self.available) {
            error!(target: "panel", "Failed to update available columns: {}", e);
        }
    }

    pub fn displayed_columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn displayed_identifiers(&self) -> Vec<&str> {
        column_fields(&self.columns)
    }

    /// The available-columns pool, in rank order
    pub fn available_columns(&self) -> &[String] {
        &self.available
    }

    /// Displayed hierarchy columns, as listed on the control panel
    pub fn pinned_hierarchy_columns(&self) -> Vec<ColumnDef> {
        self.columns
            .iter()
            .filter(|c| is_hierarchy(&c.field))
            .cloned()
            .collect()
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut G {
        &mut self.grid
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
