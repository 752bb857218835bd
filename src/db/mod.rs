//! SQLite-backed persistence split across logical submodules.

mod connection;
mod kv;

pub use connection::ensure_schema;
pub use kv::SqliteStorage;
