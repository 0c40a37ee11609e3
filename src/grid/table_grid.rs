use anyhow::Result;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use tracing::debug;

use crate::columns::definition::{ColumnDef, MergeMode};
use crate::config::config::DisplayConfig;
use crate::data::row::RowRecord;
use crate::grid::cell_decoration::{CellDecoration, CellStyler};
use crate::grid::row_span::row_spans;
use crate::grid::GridApi;

#[derive(Debug, Clone, PartialEq)]
struct SortState {
    column: String,
    ascending: bool,
}

/// Case-insensitive "contains" filter on one column
#[derive(Debug, Clone, PartialEq)]
struct RowFilter {
    column: String,
    text: String,
    needle: String,
}

impl RowFilter {
    fn matches(&self, row: &RowRecord) -> bool {
        row.text(&self.column).to_lowercase().contains(&self.needle)
    }
}

/// Terminal grid: holds the column and row sets and renders them as a table
pub struct TableGrid {
    columns: Vec<ColumnDef>,
    rows: Vec<RowRecord>,

    /// Indices into `rows` in display order
    visible_rows: Vec<usize>,

    sort: Option<SortState>,
    filter: Option<RowFilter>,
    options: DisplayConfig,
}

impl TableGrid {
    pub fn new(options: DisplayConfig) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            visible_rows: Vec::new(),
            sort: None,
            filter: None,
            options,
        }
    }

    /// Sort displayed rows by a displayed column
    pub fn sort_by(&mut self, column: &str, ascending: bool) -> Result<()> {
        if !self.columns.iter().any(|c| c.field == column) {
            return Err(anyhow::anyhow!("Column '{}' is not displayed", column));
        }
        self.sort = Some(SortState {
            column: column.to_string(),
            ascending,
        });
        self.apply_view();
        Ok(())
    }

    /// Back to server order
    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.apply_view();
    }

    /// Keep only rows whose `column` text contains `text`, ignoring case.
    /// Empty text removes the filter.
    pub fn filter_rows(&mut self, column: &str, text: &str) -> Result<()> {
        if !self.columns.iter().any(|c| c.field == column) {
            return Err(anyhow::anyhow!("Column '{}' is not displayed", column));
        }
        let text = text.trim();
        if text.is_empty() {
            self.clear_filter();
            return Ok(());
        }
        self.filter = Some(RowFilter {
            column: column.to_string(),
            text: text.to_string(),
            needle: text.to_lowercase(),
        });
        self.apply_view();
        debug!(
            target: "grid",
            "Filter {} contains '{}': {} of {} rows",
            column,
            text,
            self.visible_rows.len(),
            self.rows.len()
        );
        Ok(())
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.apply_view();
    }

    pub fn row_filter(&self) -> Option<(&str, &str)> {
        self.filter
            .as_ref()
            .map(|f| (f.column.as_str(), f.text.as_str()))
    }

    pub fn sort_column(&self) -> Option<(&str, bool)> {
        self.sort
            .as_ref()
            .map(|s| (s.column.as_str(), s.ascending))
    }

    // Filter, then sort; the result is the displayed row order
    fn apply_view(&mut self) {
        let rows = &self.rows;
        self.visible_rows = match &self.filter {
            Some(filter) => (0..rows.len()).filter(|&i| filter.matches(&rows[i])).collect(),
            None => (0..rows.len()).collect(),
        };
        let Some(sort) = &self.sort else {
            return;
        };

        let column = sort.column.as_str();
        // Stable sort keeps server order within equal values
        self.visible_rows.sort_by(|&a, &b| {
            let cmp = match (rows[a].get(column), rows[b].get(column)) {
                (Some(x), Some(y)) => x.compare(y),
                (None, Some(_)) => std::cmp::Ordering::Less,
                (Some(_), None) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            };
            if sort.ascending {
                cmp
            } else {
                cmp.reverse()
            }
        });
    }

    /// Columns in on-screen order: pinned columns first, each group in definition order
    pub fn display_order(&self) -> Vec<&ColumnDef> {
        let pinned = self.columns.iter().filter(|c| c.is_pinned());
        let floating = self.columns.iter().filter(|c| !c.is_pinned());
        pinned.chain(floating).collect()
    }

    /// Rows in display order
    pub fn displayed_rows(&self) -> Vec<&RowRecord> {
        self.visible_rows
            .iter()
            .filter_map(|&idx| self.rows.get(idx))
            .collect()
    }

    fn header_cell(&self, column: &ColumnDef) -> Cell {
        let label = if column.is_pinned() {
            let marker = if self.options.use_glyphs { "📌" } else { "[P]" };
            format!("{} {}", marker, column.header_name)
        } else {
            column.header_name.clone()
        };
        Cell::new(label).add_attribute(Attribute::Bold)
    }

    /// Build the comfy-table for the current columns and rows
    pub fn build_table(&self) -> Table {
        let columns = self.display_order();
        let rows = self.displayed_rows();
        let shown = rows.len().min(self.options.max_display_rows);
        let rows = &rows[..shown];

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(
            columns
                .iter()
                .map(|c| self.header_cell(c))
                .collect::<Vec<_>>(),
        );

        // Spans are recomputed on every render; sorting and filtering invalidate them
        let spans: Vec<Option<Vec<usize>>> = columns
            .iter()
            .map(|c| {
                (self.options.merge_rows && c.merge == MergeMode::RowSpan)
                    .then(|| row_spans(&c.field, rows))
            })
            .collect();

        let styler = CellStyler::new(&self.options.balance_color, self.options.highlight_merged);

        for (row_idx, row) in rows.iter().enumerate() {
            let cells: Vec<Cell> = columns
                .iter()
                .zip(spans.iter())
                .map(|(column, column_spans)| {
                    let span = column_spans.as_ref().map(|s| s[row_idx]);
                    if span == Some(0) {
                        return Cell::new("");
                    }
                    let decoration = CellDecoration::for_cell(row, &column.field);
                    styler.style(row.get(&column.field), decoration, span.is_some())
                })
                .collect();
            table.add_row(cells);
        }

        debug!(target: "grid", "Built table with {} columns, {} rows", columns.len(), shown);
        table
    }

    /// Render to text, with a trailing row-count line
    pub fn render(&self) -> String {
        if self.columns.is_empty() {
            return "No columns to display.".to_string();
        }
        let total = self.visible_rows.len();
        if total == 0 {
            let note = if self.filter.is_some() {
                "No rows match the filter."
            } else {
                "No rows loaded."
            };
            return format!("{}\n{}", self.build_table(), note);
        }

        let shown = total.min(self.options.max_display_rows);
        let mut out = format!("{}\n", self.build_table());
        if shown < total {
            out.push_str(&format!("{} of {} rows shown", shown, total));
        } else {
            out.push_str(&format!("{} rows", total));
        }
        if let Some((column, text)) = self.row_filter() {
            out.push_str(&format!(
                " (filtered from {} by {} contains '{}')",
                self.rows.len(),
                column,
                text
            ));
        }
        if let Some((column, ascending)) = self.sort_column() {
            out.push_str(&format!(
                " (sorted by {} {})",
                column,
                if ascending { "asc" } else { "desc" }
            ));
        }
        out
    }
}

impl GridApi for TableGrid {
    fn set_column_defs(&mut self, columns: Vec<ColumnDef>) {
        self.columns = columns;
        let shown = |column: &str| self.columns.iter().any(|c| c.field == column);
        let sort_gone = self.sort.as_ref().is_some_and(|s| !shown(&s.column));
        let filter_gone = self.filter.as_ref().is_some_and(|f| !shown(&f.column));
        if sort_gone {
            self.sort = None;
        }
        if filter_gone {
            self.filter = None;
        }
        if sort_gone || filter_gone {
            self.apply_view();
        }
    }

    fn column_defs(&self) -> &[ColumnDef] {
        &self.columns
    }

    fn set_row_data(&mut self, rows: Vec<RowRecord>) {
        self.rows = rows;
        self.apply_view();
    }

    fn displayed_row_count(&self) -> usize {
        self.visible_rows.len()
    }

    fn displayed_row(&self, index: usize) -> Option<&RowRecord> {
        self.visible_rows
            .get(index)
            .and_then(|&idx| self.rows.get(idx))
    }
}
