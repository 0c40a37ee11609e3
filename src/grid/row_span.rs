use std::borrow::Borrow;

use crate::data::row::RowRecord;

fn as_record<R: Borrow<RowRecord>>(row: &R) -> &RowRecord {
    row.borrow()
}

/// Number of rows, starting at `row_index`, that share the value found at
/// `row_index` in `column_id`. Only the contiguous run counts; an index past
/// the end yields 1.
pub fn row_span<R: Borrow<RowRecord>>(column_id: &str, row_index: usize, rows: &[R]) -> usize {
    let Some(current) = rows.get(row_index) else {
        return 1;
    };
    let current = as_record(current);
    let value = current.get(column_id);

    let matches = rows[row_index + 1..]
        .iter()
        .map(as_record)
        .take_while(|next| next.get(column_id) == value)
        .count();

    matches + 1
}

/// Span for every row of a column in one pass: run starts carry the run
/// length, rows covered by an earlier run carry 0.
pub fn row_spans<R: Borrow<RowRecord>>(column_id: &str, rows: &[R]) -> Vec<usize> {
    let mut spans = vec![0; rows.len()];
    let mut idx = 0;
    while idx < rows.len() {
        let span = row_span(column_id, idx, rows);
        spans[idx] = span;
        idx += span;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[&str]) -> Vec<RowRecord> {
        values
            .iter()
            .map(|v| RowRecord::from_pairs([("group", *v), ("amount", "1.00")]))
            .collect()
    }

    #[test]
    fn test_contiguous_run() {
        let data = rows(&["A", "A", "A", "B", "A"]);
        assert_eq!(row_span("group", 0, &data), 3);
        assert_eq!(row_span("group", 1, &data), 2);
        assert_eq!(row_span("group", 3, &data), 1);
        assert_eq!(row_span("group", 4, &data), 1);
    }

    #[test]
    fn test_out_of_range_and_empty() {
        let data = rows(&["A"]);
        assert_eq!(row_span("group", 5, &data), 1);
        let empty: Vec<RowRecord> = Vec::new();
        assert_eq!(row_span("group", 0, &empty), 1);
        assert!(row_spans("group", &empty).is_empty());
    }

    #[test]
    fn test_missing_column_counts_as_equal() {
        let data = rows(&["A", "B", "C"]);
        assert_eq!(row_span("absent", 0, &data), 3);
    }

    #[test]
    fn test_spans_for_whole_column() {
        let data = rows(&["A", "A", "A", "B", "A"]);
        assert_eq!(row_spans("group", &data), vec![3, 0, 0, 1, 1]);
    }

    #[test]
    fn test_works_over_borrowed_rows() {
        let data = rows(&["X", "X", "Y"]);
        let view: Vec<&RowRecord> = data.iter().rev().collect();
        assert_eq!(row_span("group", 0, &view), 1);
        assert_eq!(row_span("group", 1, &view), 2);
    }
}
