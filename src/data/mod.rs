//! Report rows as received from the server

pub mod row;
