pub mod api_client;
pub mod columns;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod export;
pub mod filter;
pub mod grid;
pub mod panel;
pub mod report_source;
pub mod utils;
