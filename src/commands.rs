use anyhow::Result;

/// A line typed at the dashboard prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set both date pickers and fetch
    Filter { start: String, end: String },
    Currency(bool),
    Add(String),
    Remove(String),
    /// Show the control panel
    Columns,
    /// Show the grid
    Show,
    Sort { column: String, ascending: bool },
    Unsort,
    /// Show only rows whose column contains the text
    Where { column: String, text: String },
    Unwhere,
    Refresh,
    Export(String),
    Log,
    Help,
    Quit,
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Empty);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "filter" => {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                match parts.as_slice() {
                    [start, end] => Ok(Command::Filter {
                        start: start.to_string(),
                        end: end.to_string(),
                    }),
                    _ => Err(anyhow::anyhow!("Usage: filter <start YYYY-MM-DD> <end YYYY-MM-DD>")),
                }
            }
            "currency" => match rest.to_lowercase().as_str() {
                "on" | "true" | "yes" => Ok(Command::Currency(true)),
                "off" | "false" | "no" => Ok(Command::Currency(false)),
                _ => Err(anyhow::anyhow!("Usage: currency on|off")),
            },
            "add" => Ok(Command::Add(rest.to_string())),
            "remove" | "rm" => {
                if rest.is_empty() {
                    Err(anyhow::anyhow!("Usage: remove <column>"))
                } else {
                    Ok(Command::Remove(rest.to_string()))
                }
            }
            "columns" | "cols" => Ok(Command::Columns),
            "show" => Ok(Command::Show),
            "sort" => parse_sort(rest),
            "unsort" => Ok(Command::Unsort),
            "where" => parse_where(rest),
            "unwhere" => Ok(Command::Unwhere),
            "refresh" => Ok(Command::Refresh),
            "export" => {
                if rest.is_empty() {
                    Err(anyhow::anyhow!("Usage: export <filename>"))
                } else {
                    Ok(Command::Export(rest.to_string()))
                }
            }
            "log" => Ok(Command::Log),
            "help" | "\\help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "\\q" => Ok(Command::Quit),
            other => Err(anyhow::anyhow!("Unknown command '{}'. Type 'help'.", other)),
        }
    }
}

fn parse_sort(rest: &str) -> Result<Command> {
    if rest.is_empty() {
        return Err(anyhow::anyhow!("Usage: sort <column> [asc|desc]"));
    }
    let (column, ascending) = match rest.rsplit_once(char::is_whitespace) {
        Some((column, dir)) if dir.eq_ignore_ascii_case("desc") => (column.trim(), false),
        Some((column, dir)) if dir.eq_ignore_ascii_case("asc") => (column.trim(), true),
        _ => (rest, true),
    };
    Ok(Command::Sort {
        column: column.to_string(),
        ascending,
    })
}

// Column names contain spaces, so the text follows an '='
fn parse_where(rest: &str) -> Result<Command> {
    match rest.split_once('=') {
        Some((column, text)) if !column.trim().is_empty() && !text.trim().is_empty() => {
            Ok(Command::Where {
                column: column.trim().to_string(),
                text: text.trim().to_string(),
            })
        }
        _ => Err(anyhow::anyhow!("Usage: where <column> = <text>")),
    }
}

pub fn help_text() -> &'static str {
    r#"Commands:
  filter <start> <end>   Fetch the report for a date range (YYYY-MM-DD)
  currency on|off        Group by account currency and refetch
  add <column>           Pin a column from the available list
  remove <column>        Remove a displayed column
  columns                Show pinned and available columns
  show                   Show the grid
  sort <column> [desc]   Sort rows by a displayed column
  unsort                 Restore server row order
  where <column> = <text>  Show rows whose column contains text
  unwhere                Show all rows again
  refresh                Refetch with the current filter
  export <file.csv>      Write the grid to CSV
  log                    Show recent log entries
  help                   Show this help
  quit                   Exit"#
}
