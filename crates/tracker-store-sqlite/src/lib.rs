//! SQLite backend for the team tracker.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The lifecycle rules (visit recording,
//! planning, assignment) and the statistics aggregator live here, each
//! expressed as one transaction against the connection.

mod encode;
mod lifecycle;
mod schema;
mod stats;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
