//! Core library for the verse-tap terminal app: a random verse on every tap,
//! plus a small bookmark list kept on this device under a nickname.
//!
//! The binary wires these pieces together; tests and other front-ends can
//! build a [`VerseStore`] over [`MemoryStorage`] and a scripted
//! [`SequenceRandom`] instead.
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod random;
pub mod storage;
pub mod store;
pub mod ui;

pub use catalog::VerseCatalog;
pub use config::Config;
pub use db::{ensure_schema, SqliteStorage};
pub use error::{CatalogError, StorageError, StoreError};
pub use logging::init_logging;
pub use models::{Bookmark, Nickname, SavedVerse, Verse, VerseId};
pub use random::{RandomSource, SequenceRandom, ThreadRandom};
pub use storage::{KeyValueStorage, MemoryStorage};
pub use store::VerseStore;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
