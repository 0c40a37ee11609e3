// Dashboard fetch flow against an in-memory report source

use anyhow::Result;
use comfy_table::{CellAlignment, Color};
use std::sync::{Arc, Mutex};

use cashflow_grid::columns::controller::{ColumnChange, ColumnSetController};
use cashflow_grid::columns::hierarchy::CURRENCY_COLUMN;
use cashflow_grid::config::config::DisplayConfig;
use cashflow_grid::dashboard::{Dashboard, FetchOutcome};
use cashflow_grid::data::row::RowRecord;
use cashflow_grid::filter::FilterState;
use cashflow_grid::grid::cell_decoration::{CellDecoration, CellStyler};
use cashflow_grid::grid::table_grid::TableGrid;
use cashflow_grid::grid::GridApi;
use cashflow_grid::panel::{Notifier, TerminalPanel};
use cashflow_grid::report_source::ReportSource;

#[derive(Clone)]
enum Reply {
    Rows(Vec<RowRecord>),
    Empty,
    Fail,
}

#[derive(Default)]
struct SourceLog {
    requests: Vec<FilterState>,
    raw_reads: usize,
}

/// Replays canned replies in order and records every request
struct ScriptedSource {
    replies: Mutex<Vec<Reply>>,
    log: Arc<Mutex<SourceLog>>,
}

impl ScriptedSource {
    fn new(replies: Vec<Reply>) -> (Self, Arc<Mutex<SourceLog>>) {
        let log = Arc::new(Mutex::new(SourceLog::default()));
        let source = Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            log: Arc::clone(&log),
        };
        (source, log)
    }
}

impl ReportSource for ScriptedSource {
    fn fetch_report(&self, filter: &FilterState) -> Result<Option<Vec<RowRecord>>> {
        self.log.lock().unwrap().requests.push(filter.clone());
        match self.replies.lock().unwrap().pop().unwrap_or(Reply::Empty) {
            Reply::Rows(rows) => Ok(Some(rows)),
            Reply::Empty => Ok(None),
            Reply::Fail => Err(anyhow::anyhow!("Network response was not ok: Internal Server Error")),
        }
    }

    fn raw_response(&self, _filter: &FilterState) -> Result<String> {
        self.log.lock().unwrap().raw_reads += 1;
        Ok("<html>500</html>".to_string())
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

#[derive(Default)]
struct SilentNotifier {
    count: usize,
}

impl Notifier for SilentNotifier {
    fn notify(&mut self, _message: &str) {
        self.count += 1;
    }
}

type TestDashboard = Dashboard<TableGrid, TerminalPanel, SilentNotifier>;

fn dashboard(replies: Vec<Reply>, include_currency: bool) -> (TestDashboard, Arc<Mutex<SourceLog>>) {
    let (source, log) = ScriptedSource::new(replies);
    let controller = ColumnSetController::new(
        TableGrid::new(DisplayConfig::default()),
        TerminalPanel::new(),
        SilentNotifier::default(),
    );
    (Dashboard::new(Box::new(source), controller, include_currency), log)
}

fn report_rows() -> Vec<RowRecord> {
    vec![
        RowRecord::from_pairs([
            ("Cash Flow Main 4", "Opening Balance"),
            ("Cash Flow Category", ""),
            ("2024-01-01", "100.00"),
        ]),
        RowRecord::from_pairs([
            ("Cash Flow Main 4", "Operating"),
            ("Cash Flow Category", "Sales"),
            ("2024-01-01", "40.00"),
        ]),
        RowRecord::from_pairs([
            ("Cash Flow Main 4", "Closing Balance"),
            ("Cash Flow Category", ""),
            ("2024-01-01", "140.00"),
        ]),
    ]
}

fn currency_rows() -> Vec<RowRecord> {
    vec![RowRecord::from_pairs([
        ("Cash Flow Main 4", "Operating"),
        ("2024-01-01", "40.00"),
        (CURRENCY_COLUMN, "GBP"),
    ])]
}

#[test]
fn test_bootstrap_loads_columns_and_rows() {
    let (mut dash, log) = dashboard(vec![Reply::Rows(report_rows())], false);

    assert_eq!(dash.bootstrap(), FetchOutcome::Updated { rows: 3 });

    let ctl = dash.controller();
    assert_eq!(
        ctl.displayed_identifiers(),
        vec!["Cash Flow Main 4", "Cash Flow Category", "2024-01-01"]
    );
    assert_eq!(ctl.grid().displayed_row_count(), 3);
    assert_eq!(
        ctl.grid().displayed_row(2).map(|r| r.text("2024-01-01")),
        Some("140.00".to_string())
    );

    let log = log.lock().unwrap();
    assert_eq!(log.requests, vec![FilterState::new(None, None, false)]);
}

#[test]
fn test_date_filter_needs_both_dates() {
    let (mut dash, log) = dashboard(vec![Reply::Rows(report_rows())], false);

    dash.set_date_range("2024-01-01", "").unwrap();
    assert_eq!(dash.apply_date_filter(), FetchOutcome::Skipped);
    assert!(log.lock().unwrap().requests.is_empty());

    dash.set_date_range("2024-01-01", "2024-01-31").unwrap();
    assert_eq!(dash.apply_date_filter(), FetchOutcome::Updated { rows: 3 });

    let log = log.lock().unwrap();
    assert_eq!(
        log.requests[0].query_string(),
        "?start_date=2024-01-01&end_date=2024-01-31"
    );
}

#[test]
fn test_bad_date_leaves_range_untouched() {
    let (mut dash, _log) = dashboard(vec![], false);
    dash.set_date_range("2024-01-01", "2024-01-31").unwrap();

    assert!(dash.set_date_range("2024-02-01", "2024-13-45").is_err());
    assert_eq!(
        dash.date_range(),
        (Some("2024-01-01".to_string()), Some("2024-01-31".to_string()))
    );
}

#[test]
fn test_currency_toggle_refetches_and_pins_currency_first() {
    let (mut dash, log) = dashboard(
        vec![Reply::Rows(report_rows()), Reply::Rows(currency_rows())],
        false,
    );
    dash.bootstrap();

    // Toggling fetches even without a date range
    assert_eq!(dash.set_include_currency(true), FetchOutcome::Updated { rows: 1 });
    assert!(dash.include_currency());
    assert_eq!(
        dash.controller().displayed_identifiers(),
        vec![CURRENCY_COLUMN, "Cash Flow Main 4", "2024-01-01"]
    );

    let log = log.lock().unwrap();
    assert_eq!(log.requests.len(), 2);
    assert_eq!(log.requests[1].query_string(), "?include_currency=true");
}

#[test]
fn test_empty_result_keeps_previous_display() {
    let (mut dash, _log) = dashboard(vec![Reply::Rows(report_rows()), Reply::Empty], false);
    dash.bootstrap();
    let before = dash.controller().displayed_columns().to_vec();

    assert_eq!(dash.refresh(), FetchOutcome::NoData);
    assert_eq!(dash.controller().displayed_columns(), &before[..]);
    assert_eq!(dash.controller().grid().displayed_row_count(), 3);
}

#[test]
fn test_failed_fetch_reads_raw_response_and_keeps_display() {
    let (mut dash, log) = dashboard(vec![Reply::Rows(report_rows()), Reply::Fail], false);
    dash.bootstrap();

    assert_eq!(dash.refresh(), FetchOutcome::Failed);
    assert_eq!(log.lock().unwrap().raw_reads, 1);
    assert_eq!(dash.controller().grid().displayed_row_count(), 3);
    assert_eq!(dash.controller().displayed_columns().len(), 3);
}

#[test]
fn test_column_edits_survive_until_next_fetch() {
    let (mut dash, _log) = dashboard(
        vec![Reply::Rows(report_rows()), Reply::Rows(report_rows())],
        false,
    );
    dash.bootstrap();

    assert_eq!(dash.remove_column("Cash Flow Category"), ColumnChange::Applied);
    assert_eq!(dash.add_column("Cash Flow Main 1"), ColumnChange::Applied);
    assert_eq!(
        dash.controller().displayed_identifiers(),
        vec!["Cash Flow Main 4", "2024-01-01", "Cash Flow Main 1"]
    );

    // A refetch rebuilds the column list from the data
    dash.refresh();
    assert_eq!(
        dash.controller().displayed_identifiers(),
        vec!["Cash Flow Main 4", "Cash Flow Category", "2024-01-01"]
    );
}

#[test]
fn test_rejected_add_notifies_once() {
    let (mut dash, _log) = dashboard(vec![Reply::Rows(report_rows())], false);
    dash.bootstrap();
    dash.remove_column("Cash Flow Main 4");

    assert!(matches!(
        dash.add_column("Cash Flow Main 4"),
        ColumnChange::Rejected(_)
    ));
    assert_eq!(dash.controller().notifier().count, 1);
}

#[test]
fn test_rendered_grid_merges_and_marks_balances() {
    let (mut dash, _log) = dashboard(vec![Reply::Rows(report_rows())], false);
    dash.bootstrap();

    let grid = dash.controller().grid();
    let text = grid.render();
    assert!(text.contains("Opening Balance"));
    assert!(text.contains("Closing Balance"));
    assert!(text.contains("3 rows"));

    let styler = CellStyler::new("cyan", true);
    let opening = grid.displayed_row(0).unwrap();
    let label = CellDecoration::for_cell(opening, "Cash Flow Main 4");
    let amount = CellDecoration::for_cell(opening, "2024-01-01");
    assert_eq!(label, CellDecoration::BalanceLabel);
    assert_eq!(amount, CellDecoration::BalanceValue);

    let label_style = styler.style_for(opening.get("Cash Flow Main 4"), label, true);
    assert_eq!(label_style.alignment, Some(CellAlignment::Left));
    assert_eq!(label_style.fg, Some(Color::Cyan));
    assert!(label_style.bold);

    // The opening balance has an empty category, so it is not highlighted
    let category = CellDecoration::for_cell(opening, "Cash Flow Category");
    let category_style = styler.style_for(opening.get("Cash Flow Category"), category, true);
    assert_eq!(category_style.alignment, Some(CellAlignment::Right));
    assert!(!category_style.bold);

    let operating = grid.displayed_row(1).unwrap();
    assert_eq!(
        CellDecoration::for_cell(operating, "2024-01-01"),
        CellDecoration::Default
    );
}
