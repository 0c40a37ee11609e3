use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Format used by the date pickers and the report endpoint
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of a selected date, formatted `YYYY-MM-DD`
pub trait DatePicker {
    fn selected_date(&self) -> Option<String>;
}

/// Date picker fed from typed text
#[derive(Debug, Clone, Default)]
pub struct TextDatePicker {
    value: Option<NaiveDate>,
}

impl TextDatePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set from `YYYY-MM-DD`; an empty string clears the selection
    pub fn set(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            self.value = None;
            return Ok(());
        }
        self.value = Some(parse_date(text)?);
        Ok(())
    }
}

impl DatePicker for TextDatePicker {
    fn selected_date(&self) -> Option<String> {
        self.value.map(|d| d.format(DATE_FORMAT).to_string())
    }
}

pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", text.trim()))
}

/// The values a report request is made with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub include_currency: bool,
}

impl FilterState {
    pub fn new(
        start_date: Option<String>,
        end_date: Option<String>,
        include_currency: bool,
    ) -> Self {
        Self {
            start_date,
            end_date,
            include_currency,
        }
    }

    /// Read both pickers
    pub fn from_pickers(
        start: &dyn DatePicker,
        end: &dyn DatePicker,
        include_currency: bool,
    ) -> Self {
        Self::new(start.selected_date(), end.selected_date(), include_currency)
    }

    /// Both ends of the range are set
    pub fn has_date_range(&self) -> bool {
        self.date_range().is_some()
    }

    pub fn date_range(&self) -> Option<(&str, &str)> {
        match (self.start_date.as_deref(), self.end_date.as_deref()) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
                Some((start, end))
            }
            _ => None,
        }
    }

    /// Query parameters: dates only as a pair, currency only when on
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some((start, end)) = self.date_range() {
            pairs.push(("start_date", start.to_string()));
            pairs.push(("end_date", end.to_string()));
        }
        if self.include_currency {
            pairs.push(("include_currency", "true".to_string()));
        }
        pairs
    }

    /// `?a=b&c=d`, or empty when there are no parameters
    pub fn query_string(&self) -> String {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return String::new();
        }
        let joined: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!("?{}", joined.join("&"))
    }
}
