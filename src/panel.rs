//! Column control panel and user notifications
//!
//! The panel lists the pinned hierarchy columns with a removal affordance
//! and offers the columns that can be added back.

use anyhow::Result;
use crossterm::style::Stylize;

use crate::columns::definition::ColumnDef;
use crate::columns::hierarchy::display_label;

/// Where the controller publishes the active and available columns
pub trait ControlPanel {
    /// One entry per pinned hierarchy column currently displayed
    fn show_active_columns(&mut self, columns: &[ColumnDef]) -> Result<()>;

    /// The add dropdown, listing the available-columns pool
    fn show_available_columns(&mut self, available: &[String]) -> Result<()>;
}

/// Blocking user-facing warning
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Panel rendered as text lines for the shell
#[derive(Debug)]
pub struct TerminalPanel {
    active: Vec<String>,
    dropdown: Vec<String>,
}

impl TerminalPanel {
    pub fn new() -> Self {
        Self {
            active: Vec::new(),
            dropdown: Vec::new(),
        }
    }

    pub fn active_labels(&self) -> &[String] {
        &self.active
    }

    pub fn dropdown_options(&self) -> &[String] {
        &self.dropdown
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", "Pinned columns:".yellow()));
        if self.active.is_empty() {
            out.push_str("  (none)\n");
        }
        for label in &self.active {
            out.push_str(&format!("  {} {}\n", label, "[x] remove".dark_grey()));
        }

        out.push_str(&format!("{}\n", "Available to add:".yellow()));
        if self.dropdown.is_empty() {
            out.push_str("  (none)\n");
        }
        for field in &self.dropdown {
            out.push_str(&format!("  {}\n", option_label(field).green()));
        }
        out
    }
}

impl Default for TerminalPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlPanel for TerminalPanel {
    fn show_active_columns(&mut self, columns: &[ColumnDef]) -> Result<()> {
        self.active = columns.iter().map(|c| c.header_name.clone()).collect();
        Ok(())
    }

    fn show_available_columns(&mut self, available: &[String]) -> Result<()> {
        self.dropdown = available.to_vec();
        Ok(())
    }
}

/// Prints warnings to stderr
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, message: &str) {
        eprintln!("{}", format!("⚠ {}", message).red().bold());
    }
}

/// Label for a pool entry as shown in the dropdown
pub fn option_label(field: &str) -> String {
    let label = display_label(field);
    if label == field {
        label
    } else {
        format!("{} ({})", label, field)
    }
}
