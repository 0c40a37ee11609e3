use comfy_table::{Attribute, Cell, CellAlignment, Color};

use crate::columns::hierarchy::BALANCE_MARKER_COLUMN;
use crate::data::row::{CellValue, RowRecord};

const OPENING_BALANCE: &str = "Opening Balance";
const CLOSING_BALANCE: &str = "Closing Balance";

/// Per-cell styling, chosen from the row's balance marker value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellDecoration {
    Default,
    /// The "Opening/Closing Balance" label cell
    BalanceLabel,
    /// Any other cell on a balance row
    BalanceValue,
}

impl CellDecoration {
    pub fn for_cell(row: &RowRecord, field: &str) -> Self {
        let is_balance_row = row
            .get(BALANCE_MARKER_COLUMN)
            .and_then(|v| v.as_str())
            .map(|marker| marker == OPENING_BALANCE || marker == CLOSING_BALANCE)
            .unwrap_or(false);

        if !is_balance_row {
            CellDecoration::Default
        } else if field == BALANCE_MARKER_COLUMN {
            CellDecoration::BalanceLabel
        } else {
            CellDecoration::BalanceValue
        }
    }

    pub fn alignment(&self) -> Option<CellAlignment> {
        match self {
            CellDecoration::Default => None,
            CellDecoration::BalanceLabel => Some(CellAlignment::Left),
            CellDecoration::BalanceValue => Some(CellAlignment::Right),
        }
    }
}

/// Resolved look of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub alignment: Option<CellAlignment>,
    pub fg: Option<Color>,
    pub bold: bool,
}

/// Turns cell values into styled comfy-table cells
pub struct CellStyler {
    balance_color: Color,
    highlight_merged: bool,
}

impl CellStyler {
    pub fn new(balance_color: &str, highlight_merged: bool) -> Self {
        Self {
            balance_color: parse_color(balance_color),
            highlight_merged,
        }
    }

    /// `merged` marks a cell in a row-merging column
    pub fn style_for(
        &self,
        value: Option<&CellValue>,
        decoration: CellDecoration,
        merged: bool,
    ) -> CellStyle {
        let has_value = value.map(|v| !v.is_blank()).unwrap_or(false);
        CellStyle {
            alignment: decoration.alignment(),
            fg: (decoration != CellDecoration::Default).then_some(self.balance_color),
            // cell-span: merged cells with a value stand out
            bold: merged && self.highlight_merged && has_value,
        }
    }

    pub fn style(
        &self,
        value: Option<&CellValue>,
        decoration: CellDecoration,
        merged: bool,
    ) -> Cell {
        let text = value.map(|v| v.to_string()).unwrap_or_default();
        let style = self.style_for(value, decoration, merged);

        let mut cell = Cell::new(text);
        if let Some(alignment) = style.alignment {
            cell = cell.set_alignment(alignment);
        }
        if let Some(color) = style.fg {
            cell = cell.fg(color);
        }
        if style.bold {
            cell = cell.add_attribute(Attribute::Bold);
        }
        cell
    }
}

/// Parse a color name, falling back to cyan
pub fn parse_color(color_str: &str) -> Color {
    match color_str.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Grey,
        "dark_gray" | "dark_grey" => Color::DarkGrey,
        "white" => Color::White,
        "orange" => Color::Rgb {
            r: 255,
            g: 165,
            b: 0,
        },
        _ => Color::Cyan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance_row(marker: &str) -> RowRecord {
        RowRecord::from_pairs([
            (BALANCE_MARKER_COLUMN, marker),
            ("Cash Flow Category", ""),
            ("2024-01-01", "100.00"),
        ])
    }

    #[test]
    fn test_balance_rows_decorated() {
        for marker in [OPENING_BALANCE, CLOSING_BALANCE] {
            let row = balance_row(marker);
            assert_eq!(
                CellDecoration::for_cell(&row, BALANCE_MARKER_COLUMN),
                CellDecoration::BalanceLabel
            );
            assert_eq!(
                CellDecoration::for_cell(&row, "2024-01-01"),
                CellDecoration::BalanceValue
            );
        }
    }

    #[test]
    fn test_regular_row_uses_default() {
        let row = balance_row("Operating Receipts");
        let decoration = CellDecoration::for_cell(&row, BALANCE_MARKER_COLUMN);
        assert_eq!(decoration, CellDecoration::Default);
        assert_eq!(decoration.alignment(), None);
    }

    #[test]
    fn test_balance_cells_are_aligned_and_colored() {
        let styler = CellStyler::new("yellow", true);
        let label = CellValue::from(OPENING_BALANCE);
        let amount = CellValue::from("100.00");

        assert_eq!(
            styler.style_for(Some(&label), CellDecoration::BalanceLabel, false),
            CellStyle {
                alignment: Some(CellAlignment::Left),
                fg: Some(Color::Yellow),
                bold: false,
            }
        );
        assert_eq!(
            styler.style_for(Some(&amount), CellDecoration::BalanceValue, false),
            CellStyle {
                alignment: Some(CellAlignment::Right),
                fg: Some(Color::Yellow),
                bold: false,
            }
        );
        assert_eq!(
            styler.style_for(Some(&amount), CellDecoration::Default, false),
            CellStyle {
                alignment: None,
                fg: None,
                bold: false,
            }
        );
    }

    #[test]
    fn test_only_merged_cells_with_a_value_are_bold() {
        let styler = CellStyler::new("cyan", true);
        let sales = CellValue::from("Sales");

        assert!(styler.style_for(Some(&sales), CellDecoration::Default, true).bold);
        assert!(!styler.style_for(Some(&sales), CellDecoration::Default, false).bold);
        assert!(!styler.style_for(Some(&CellValue::from("")), CellDecoration::Default, true).bold);
        assert!(!styler.style_for(Some(&CellValue::Null), CellDecoration::Default, true).bold);
        assert!(!styler.style_for(None, CellDecoration::Default, true).bold);

        let plain = CellStyler::new("cyan", false);
        assert!(!plain.style_for(Some(&sales), CellDecoration::Default, true).bold);
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!(parse_color("Red"), Color::Red);
        assert_eq!(parse_color("orange"), Color::Rgb { r: 255, g: 165, b: 0 });
        assert_eq!(parse_color("unknown"), Color::Cyan);
    }
}
