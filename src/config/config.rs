use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `server.base_url`
pub const API_URL_ENV: &str = "CASHFLOW_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the report server, without the endpoint path
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for the pinned-column marker
    pub use_glyphs: bool,

    /// Collapse runs of identical values into one cell
    pub merge_rows: bool,

    /// Bold merged cells that carry a value
    pub highlight_merged: bool,

    /// Maximum rows rendered at once
    pub max_display_rows: usize,

    /// Color of opening/closing balance rows
    pub balance_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Group by account currency when the shell starts
    pub include_currency_default: bool,

    /// Fetch the current month's report on startup
    pub fetch_on_startup: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            merge_rows: true,
            highlight_merged: true,
            max_display_rows: 500,
            balance_color: "cyan".to_string(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            include_currency_default: false,
            fetch_on_startup: true,
        }
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load config from a file, creating it with defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.server.base_url = url.trim().to_string();
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("cashflow-grid").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Cashflow Grid Configuration File
# Location: ~/.config/cashflow-grid/config.toml (Linux)
#           ~/Library/Application Support/cashflow-grid/config.toml (macOS)
#           %APPDATA%\cashflow-grid\config.toml (Windows)

[server]
# Report server; the CASHFLOW_API_URL environment variable takes precedence
base_url = "http://localhost:5000"

# Seconds to wait for the report endpoint
timeout_secs = 30

[display]
# Use Unicode glyphs for the pinned-column marker
# Set to false for ASCII-only mode
use_glyphs = true

# Collapse consecutive identical values into a single cell
merge_rows = true

# Bold merged cells that carry a value
highlight_merged = true

# Maximum number of rows rendered at once
max_display_rows = 500

# Color of opening/closing balance rows: "cyan", "yellow", "green", "orange", ...
balance_color = "cyan"

[behavior]
# Group by account currency when the shell starts
include_currency_default = false

# Fetch the current month's report on startup
fetch_on_startup = true
"#
        .to_string()
    }
}
