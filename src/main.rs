//! Binary entry point: resolve configuration, start logging, open the local
//! store, and drive the Ratatui event loop until the user exits.
use anyhow::Context;
use verse_tap::{
    ensure_schema, init_logging, run_app, App, Config, SqliteStorage, ThreadRandom, VerseCatalog,
    VerseStore,
};

/// Returning a `Result` bubbles fatal setup problems (unwritable data
/// directory, broken terminal) to the shell instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_logging(&config)?;

    let conn = ensure_schema(&config.db_path())?;
    let catalog = VerseCatalog::builtin().context("failed to load built-in verses")?;
    tracing::info!(verses = catalog.len(), data_dir = %config.data_dir.display(), "starting");

    let store = VerseStore::new(catalog, SqliteStorage::new(conn), ThreadRandom::new());
    let mut app = App::new(store);
    run_app(&mut app)
}
