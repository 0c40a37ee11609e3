//! Column management for the report grid
//!
//! `hierarchy` holds the fixed grouping order and its validator,
//! `definition` the column definitions handed to the grid, and
//! `controller` the state machine that owns the displayed set.

pub mod controller;
pub mod definition;
pub mod hierarchy;
