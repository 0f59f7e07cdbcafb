//! Database layer for edugraph.
//!
//! Handles SQLite database connection, schema creation, and low-level queries.

mod connection;
pub mod schema;

pub use connection::{Connection, DbPath, DB_FILE};
pub use schema::Schema;
