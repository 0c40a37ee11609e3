//! Fixed grouping hierarchy of the cash-flow report and the ordering rule
//! that every displayed column list must respect.

/// Leading identifier that groups the report by account currency.
pub const CURRENCY_COLUMN: &str = "transaction_currency_code";

/// Label shown for [`CURRENCY_COLUMN`].
pub const CURRENCY_LABEL: &str = "Account Currency";

/// Grouping columns from coarsest to finest.
pub const HIERARCHY_COLUMNS: [&str; 5] = [
    "Cash Flow Main 4",
    "Cash Flow Main 3",
    "Cash Flow Main 2",
    "Cash Flow Main 1",
    "Cash Flow Category",
];

/// The currency column followed by the hierarchy; index is the rank.
pub const REQUIRED_PINNED_COLUMNS: [&str; 6] = [
    CURRENCY_COLUMN,
    "Cash Flow Main 4",
    "Cash Flow Main 3",
    "Cash Flow Main 2",
    "Cash Flow Main 1",
    "Cash Flow Category",
];

/// Column whose value marks the opening/closing balance rows.
pub const BALANCE_MARKER_COLUMN: &str = "Cash Flow Main 4";

/// Fixed rank of an identifier in the required pinned set
pub fn rank_of(identifier: &str) -> Option<usize> {
    REQUIRED_PINNED_COLUMNS
        .iter()
        .position(|&column| column == identifier)
}

pub fn is_required_pinned(identifier: &str) -> bool {
    rank_of(identifier).is_some()
}

/// True for the five grouping columns (the currency column is not one of them)
pub fn is_hierarchy(identifier: &str) -> bool {
    HIERARCHY_COLUMNS.contains(&identifier)
}

/// Header label for a column identifier
pub fn display_label(identifier: &str) -> String {
    if identifier == CURRENCY_COLUMN {
        CURRENCY_LABEL.to_string()
    } else {
        identifier.to_string()
    }
}

/// Check that the required pinned columns in `candidate` appear in strictly
/// increasing rank order. Other columns may sit anywhere.
pub fn is_valid_order<S: AsRef<str>>(candidate: &[S]) -> bool {
    let ranks: Vec<usize> = candidate
        .iter()
        .filter_map(|identifier| rank_of(identifier.as_ref()))
        .collect();

    ranks.windows(2).all(|pair| pair[0] < pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_single_are_valid() {
        let empty: [&str; 0] = [];
        assert!(is_valid_order(&empty));
        assert!(is_valid_order(&["Cash Flow Category"]));
        assert!(is_valid_order(&["2024-01-31"]));
    }

    #[test]
    fn test_full_hierarchy_in_order() {
        assert!(is_valid_order(&REQUIRED_PINNED_COLUMNS));
    }

    #[test]
    fn test_dynamic_columns_interleave_freely() {
        assert!(is_valid_order(&[
            "2024-01-01",
            "Cash Flow Main 4",
            "Amount",
            "Cash Flow Main 2",
            "2024-01-02",
            "Cash Flow Category",
        ]));
    }

    #[test]
    fn test_out_of_order_rejected() {
        assert!(!is_valid_order(&["Cash Flow Category", "Cash Flow Main 4"]));
        assert!(!is_valid_order(&[
            "Cash Flow Main 4",
            "Amount",
            CURRENCY_COLUMN
        ]));
    }

    #[test]
    fn test_duplicate_hierarchy_column_rejected() {
        assert!(!is_valid_order(&["Cash Flow Main 3", "Cash Flow Main 3"]));
    }

    #[test]
    fn test_removal_never_breaks_valid_order() {
        let order: Vec<&str> = vec![
            CURRENCY_COLUMN,
            "Cash Flow Main 4",
            "Cash Flow Main 1",
            "Amount",
            "Cash Flow Category",
        ];
        assert!(is_valid_order(&order));
        for skip in 0..order.len() {
            let shorter: Vec<&str> = order
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, c)| *c)
                .collect();
            assert!(is_valid_order(&shorter), "removing index {} broke order", skip);
        }
    }

    #[test]
    fn test_labels_and_ranks() {
        assert_eq!(display_label(CURRENCY_COLUMN), "Account Currency");
        assert_eq!(display_label("Cash Flow Main 2"), "Cash Flow Main 2");
        assert_eq!(rank_of(CURRENCY_COLUMN), Some(0));
        assert_eq!(rank_of("Cash Flow Category"), Some(5));
        assert_eq!(rank_of("Amount"), None);
        assert!(is_hierarchy("Cash Flow Main 1"));
        assert!(!is_hierarchy(CURRENCY_COLUMN));
        assert!(is_required_pinned(CURRENCY_COLUMN));
    }
}
