use anyhow::Result;
use crossterm::style::Stylize;
use reedline::{
    FileBackedHistory, Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus,
    Reedline, Signal,
};
use std::borrow::Cow;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use cashflow_grid::api_client::ApiClient;
use cashflow_grid::columns::controller::{ColumnChange, ColumnSetController};
use cashflow_grid::commands::{help_text, Command};
use cashflow_grid::config::config::Config;
use cashflow_grid::dashboard::{Dashboard, FetchOutcome};
use cashflow_grid::export::export_to_csv;
use cashflow_grid::grid::table_grid::TableGrid;
use cashflow_grid::panel::{TerminalNotifier, TerminalPanel};
use cashflow_grid::utils::app_paths::AppPaths;
use cashflow_grid::utils::dual_logging::get_dual_logger;
use cashflow_grid::utils::logging::{init_tracing, LogRingBuffer};

type TerminalDashboard = Dashboard<TableGrid, TerminalPanel, TerminalNotifier>;

struct DashboardPrompt {
    label: String,
}

impl DashboardPrompt {
    fn new(dashboard: &TerminalDashboard) -> Self {
        let mut label = String::from("cashflow");
        if let (Some(start), Some(end)) = dashboard.date_range() {
            label.push_str(&format!(" {}..{}", start, end));
        }
        if dashboard.include_currency() {
            label.push_str(" [ccy]");
        }
        Self { label }
    }
}

impl Prompt for DashboardPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.label.as_str())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<'_, str> {
        "> ".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse search: {})",
            prefix, history_search.term
        ))
    }
}

fn print_help() {
    println!("{}", "Cashflow Grid - cash-flow report viewer".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  cashflow-grid [OPTIONS]");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}  - Report start date (YYYY-MM-DD)", "--start <date>".green());
    println!("  {}    - Report end date (YYYY-MM-DD)", "--end <date>".green());
    println!("  {}      - Group by account currency", "--currency".green());
    println!("  {}     - Report server base URL", "--url <url>".green());
    println!("  {}          - Fetch, print the grid and exit", "--once".green());
    println!(
        "  {} - Write a commented config file",
        "--generate-config".green()
    );
    println!();
    println!("{}", help_text());
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

fn generate_config() -> Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, Config::create_default_with_comments())?;
    println!("Configuration file created at: {:?}", path);
    Ok(())
}

fn report_fetch(outcome: &FetchOutcome) {
    match outcome {
        FetchOutcome::Updated { rows } => {
            println!("{}", format!("Loaded {} rows", rows).green())
        }
        FetchOutcome::NoData => println!(
            "{}",
            "No data for this filter; showing previous results.".yellow()
        ),
        FetchOutcome::Skipped => println!("{}", "Select both a start and an end date.".yellow()),
        FetchOutcome::Failed => eprintln!(
            "{}",
            "Fetching the report failed; see the log for details.".red()
        ),
    }
}

fn report_change(change: &ColumnChange, verb: &str, column: &str) {
    match change {
        ColumnChange::Applied => println!("{}", format!("{} '{}'", verb, column).green()),
        // The notifier has already warned the user
        ColumnChange::Rejected(_) => {}
        ColumnChange::Ignored if column.is_empty() => {
            println!("{}", "Choose a column from the available list.".yellow())
        }
        ColumnChange::Ignored => {
            println!("{}", format!("Nothing to do for '{}'", column).yellow())
        }
    }
}

fn show_grid(dashboard: &TerminalDashboard) {
    println!("{}", dashboard.controller().grid().render());
}

fn show_panel(dashboard: &TerminalDashboard) {
    print!("{}", dashboard.controller().panel().render());
}

fn show_log(buffer: &LogRingBuffer) {
    for entry in buffer.get_recent(30) {
        println!("{}", entry.format_for_display());
    }
    if let Some(logger) = get_dual_logger() {
        println!("Full log: {}", logger.log_path().display());
    }
}

/// Run one shell command; returns false when the shell should exit
fn execute(dashboard: &mut TerminalDashboard, command: Command, buffer: &LogRingBuffer) -> bool {
    match command {
        Command::Empty => {}
        Command::Filter { start, end } => match dashboard.set_date_range(&start, &end) {
            Ok(()) => {
                let outcome = dashboard.apply_date_filter();
                report_fetch(&outcome);
                if matches!(outcome, FetchOutcome::Updated { .. }) {
                    show_grid(dashboard);
                }
            }
            Err(e) => eprintln!("{}", format!("{:#}", e).red()),
        },
        Command::Currency(on) => {
            let outcome = dashboard.set_include_currency(on);
            report_fetch(&outcome);
            if matches!(outcome, FetchOutcome::Updated { .. }) {
                show_grid(dashboard);
            }
        }
        Command::Add(column) => {
            let change = dashboard.add_column(&column);
            report_change(&change, "Added", &column);
            if change == ColumnChange::Applied {
                show_grid(dashboard);
            }
        }
        Command::Remove(column) => {
            let change = dashboard.remove_column(&column);
            report_change(&change, "Removed", &column);
            if change == ColumnChange::Applied {
                show_grid(dashboard);
            }
        }
        Command::Columns => show_panel(dashboard),
        Command::Show => show_grid(dashboard),
        Command::Sort { column, ascending } => {
            match dashboard
                .controller_mut()
                .grid_mut()
                .sort_by(&column, ascending)
            {
                Ok(()) => show_grid(dashboard),
                Err(e) => eprintln!("{}", e.to_string().red()),
            }
        }
        Command::Unsort => {
            dashboard.controller_mut().grid_mut().clear_sort();
            show_grid(dashboard);
        }
        Command::Where { column, text } => {
            match dashboard
                .controller_mut()
                .grid_mut()
                .filter_rows(&column, &text)
            {
                Ok(()) => show_grid(dashboard),
                Err(e) => eprintln!("{}", e.to_string().red()),
            }
        }
        Command::Unwhere => {
            dashboard.controller_mut().grid_mut().clear_filter();
            show_grid(dashboard);
        }
        Command::Refresh => {
            let outcome = dashboard.refresh();
            report_fetch(&outcome);
            if matches!(outcome, FetchOutcome::Updated { .. }) {
                show_grid(dashboard);
            }
        }
        Command::Export(file) => {
            match export_to_csv(dashboard.controller().grid(), Path::new(&file)) {
                Ok(rows) => println!("{}", format!("Exported {} rows to {}", rows, file).green()),
                Err(e) => eprintln!("{}", format!("Export error: {:#}", e).red()),
            }
        }
        Command::Log => show_log(buffer),
        Command::Help => println!("{}", help_text()),
        Command::Quit => return false,
    }
    true
}

fn run_shell(dashboard: &mut TerminalDashboard, buffer: &LogRingBuffer) -> Result<()> {
    let mut line_editor = Reedline::create();
    match AppPaths::history_file()
        .and_then(|path| {
            FileBackedHistory::with_file(100, path).map_err(|e| anyhow::anyhow!("{}", e))
        })
    {
        Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
        Err(e) => warn!(target: "app", "Command history disabled: {:#}", e),
    }

    println!("{}", "Type 'help' for commands.".dark_grey());

    loop {
        let prompt = DashboardPrompt::new(dashboard);
        match line_editor.read_line(&prompt)? {
            Signal::Success(line) => match Command::parse(&line) {
                Ok(command) => {
                    if !execute(dashboard, command, buffer) {
                        break;
                    }
                }
                Err(e) => eprintln!("{}", e.to_string().red()),
            },
            Signal::CtrlD | Signal::CtrlC => break,
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }
    if args.iter().any(|a| a == "--generate-config") {
        return generate_config();
    }

    let buffer = init_tracing();

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(target: "app", "Using default config: {:#}", e);
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    });
    if let Some(url) = arg_value(&args, "--url") {
        config.server.base_url = url;
    }

    let once = args.iter().any(|a| a == "--once");
    let include_currency =
        args.iter().any(|a| a == "--currency") || config.behavior.include_currency_default;

    let client = ApiClient::with_timeout(
        &config.server.base_url,
        Duration::from_secs(config.server.timeout_secs),
    )?;
    println!("{}", format!("Report server: {}", client.base_url()).cyan());

    let controller = ColumnSetController::new(
        TableGrid::new(config.display.clone()),
        TerminalPanel::new(),
        TerminalNotifier,
    );
    let mut dashboard = Dashboard::new(Box::new(client), controller, include_currency);

    let start = arg_value(&args, "--start");
    let end = arg_value(&args, "--end");
    let outcome = match (start, end) {
        (Some(start), Some(end)) => {
            dashboard.set_date_range(&start, &end)?;
            Some(dashboard.apply_date_filter())
        }
        _ if once || config.behavior.fetch_on_startup => Some(dashboard.bootstrap()),
        _ => None,
    };
    if let Some(outcome) = &outcome {
        report_fetch(outcome);
        show_grid(&dashboard);
    }

    if once {
        return Ok(());
    }

    run_shell(&mut dashboard, &buffer)
}
