use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use crate::data::row::RowRecord;
use crate::filter::FilterState;
use crate::report_source::ReportSource;

/// Path of the cash-flow report endpoint
pub const REPORT_ENDPOINT: &str = "/get-data-CF";

/// Body of a report response. The rows arrive as a JSON document encoded
/// inside a string field.
#[derive(Debug, Deserialize)]
pub struct ReportEnvelope {
    #[serde(rename = "json_data_CF")]
    pub json_data_cf: Option<String>,
    pub error: Option<String>,
}

/// Ways a report request can fail
#[derive(Debug)]
pub enum FetchError {
    /// The request never got a response
    Transport(String),
    /// The server answered with a non-success status
    Status { code: u16, reason: String },
    /// The body carried an `error` field instead of data
    Server(String),
    /// The body or the embedded row document is not valid JSON
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "Request failed: {}", msg),
            FetchError::Status { reason, .. } => {
                write!(f, "Network response was not ok: {}", reason)
            }
            FetchError::Server(msg) => write!(f, "Report server error: {}", msg),
            FetchError::Decode(msg) => write!(f, "Invalid report body: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Decode a report body. `Ok(None)` for a missing, `null` or empty table.
pub fn decode_report(body: &str) -> std::result::Result<Option<Vec<RowRecord>>, FetchError> {
    let envelope: ReportEnvelope = serde_json::from_str(body)
        .map_err(|e| FetchError::Decode(format!("body is not a JSON object: {}", e)))?;

    let Some(encoded) = envelope.json_data_cf else {
        if let Some(error) = envelope.error {
            return Err(FetchError::Server(error));
        }
        return Ok(None);
    };

    let rows: Option<Vec<RowRecord>> = serde_json::from_str(&encoded)
        .map_err(|e| FetchError::Decode(format!("json_data_CF is not an array of rows: {}", e)))?;

    Ok(rows.filter(|rows| !rows.is_empty()))
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for a filter
    pub fn report_url(&self, filter: &FilterState) -> String {
        format!(
            "{}{}{}",
            self.base_url,
            REPORT_ENDPOINT,
            filter.query_string()
        )
    }
}

impl ReportSource for ApiClient {
    fn fetch_report(&self, filter: &FilterState) -> Result<Option<Vec<RowRecord>>> {
        let url = self.report_url(filter);
        info!(target: "fetch", "GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
                reason: status
                    .canonical_reason()
                    .unwrap_or(status.as_str())
                    .to_string(),
            }
            .into());
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        debug!(target: "fetch", "Received {} bytes", body.len());
        Ok(decode_report(&body)?)
    }

    fn raw_response(&self, filter: &FilterState) -> Result<String> {
        let url = self.report_url(filter);
        let text = self.client.get(&url).send()?.text()?;
        Ok(text)
    }

    fn describe(&self) -> String {
        format!("{}{}", self.base_url, REPORT_ENDPOINT)
    }
}
