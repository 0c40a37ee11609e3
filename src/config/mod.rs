//! Configuration module
//!
//! Settings for the report server, grid display and startup behavior,
//! stored as TOML under the user's config directory.

pub mod config;
