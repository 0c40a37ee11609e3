//! Grid capability and its terminal implementation
//!
//! The column controller drives any [`GridApi`]; [`table_grid::TableGrid`]
//! renders through comfy-table and applies row merging and cell decoration.

pub mod cell_decoration;
pub mod row_span;
pub mod table_grid;

use crate::columns::definition::ColumnDef;
use crate::data::row::RowRecord;

/// What the column controller and the dashboard need from a grid
pub trait GridApi {
    /// Replace the displayed column set
    fn set_column_defs(&mut self, columns: Vec<ColumnDef>);

    /// Current column set, in definition order
    fn column_defs(&self) -> &[ColumnDef];

    /// Replace the row set wholesale
    fn set_row_data(&mut self, rows: Vec<RowRecord>);

    /// Number of rows after the grid's own sorting
    fn displayed_row_count(&self) -> usize;

    /// Row at a displayed position
    fn displayed_row(&self, index: usize) -> Option<&RowRecord>;
}
