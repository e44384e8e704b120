//! Adapter implementations
//!
//! Adapters implement the ports with concrete technologies:
//! - SQLite (rusqlite) for the Database port
//! - Local filesystem for the migrations directory
//! - A recording database double for dialect tests

pub mod directory;
pub mod sqlite;

#[cfg(test)]
pub mod recording;
