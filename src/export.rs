use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::grid::table_grid::TableGrid;

/// Write the grid as CSV: columns in on-screen order, rows in display order.
/// Merged cells are written in full.
pub fn export_to_csv(grid: &TableGrid, path: &Path) -> Result<usize> {
    let columns = grid.display_order();
    if columns.is_empty() {
        return Err(anyhow::anyhow!("No columns to export"));
    }

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(columns.iter().map(|c| c.header_name.as_str()))?;

    let rows = grid.displayed_rows();
    for row in &rows {
        wtr.write_record(columns.iter().map(|c| row.text(&c.field)))?;
    }

    wtr.flush()?;
    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::definition::ColumnDef;
    use crate::config::config::DisplayConfig;
    use crate::data::row::RowRecord;
    use crate::grid::GridApi;

    #[test]
    fn test_export_writes_display_order() {
        let mut grid = TableGrid::new(DisplayConfig::default());
        grid.set_column_defs(vec![
            ColumnDef::unpinned("2024-01-01"),
            ColumnDef::pinned("transaction_currency_code"),
        ]);
        grid.set_row_data(vec![
            RowRecord::from_pairs([("transaction_currency_code", "GBP"), ("2024-01-01", "1.00")]),
            RowRecord::from_pairs([("transaction_currency_code", "GBP"), ("2024-01-01", "2.00")]),
        ]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        assert_eq!(export_to_csv(&grid, &path).unwrap(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Account Currency,2024-01-01\nGBP,1.00\nGBP,2.00\n"
        );
    }

    #[test]
    fn test_export_empty_grid_fails() {
        let grid = TableGrid::new(DisplayConfig::default());
        let dir = tempfile::tempdir().unwrap();
        assert!(export_to_csv(&grid, &dir.path().join("x.csv")).is_err());
    }
}
