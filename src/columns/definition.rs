use crate::columns::hierarchy::display_label;

/// Side of the grid a column is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinnedSide {
    Left,
}

/// How the grid treats runs of identical values in a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Every cell is drawn on its own
    None,
    /// Consecutive equal cells collapse into one spanning cell
    RowSpan,
}

/// A column as handed to the grid
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub field: String,
    pub header_name: String,
    pub pinned: Option<PinnedSide>,
    pub merge: MergeMode,
}

impl ColumnDef {
    /// A left-pinned, row-merging column
    pub fn pinned(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            header_name: display_label(&field),
            field,
            pinned: Some(PinnedSide::Left),
            merge: MergeMode::RowSpan,
        }
    }

    /// A free-floating data column
    pub fn unpinned(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            header_name: display_label(&field),
            field,
            pinned: None,
            merge: MergeMode::RowSpan,
        }
    }

    pub fn with_merge(mut self, merge: MergeMode) -> Self {
        self.merge = merge;
        self
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }
}

/// Identifiers of a column list, in order
pub fn column_fields(columns: &[ColumnDef]) -> Vec<&str> {
    columns.iter().map(|c| c.field.as_str()).collect()
}
