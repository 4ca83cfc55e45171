//! Binary entry point that glues the file-backed shelf store and the catalog
//! worker to the TUI. Summarizing the bootstrapping pipeline here keeps the
//! intent obvious when revisiting the code: we bring up logging and the data
//! directory, hydrate the initial shelf, spawn the catalog worker, and drive
//! the Ratatui event loop until the user exits.
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Level;

use bookshelf_tracker::{run_app, App, CatalogClient, CatalogWorker, FileStore, ShelfStore};

/// Log file name inside the data directory. Logging goes to a file because
/// stderr shares the terminal with the alternate screen.
const LOG_FILE_NAME: &str = "bookshelf.log";

/// Initialize persistence and logging, load the saved shelf, and launch the
/// Ratatui event loop.
///
/// Returning a `Result` bubbles up fatal initialization problems to the
/// terminal instead of crashing silently. A corrupt shelf file lands here on
/// purpose: starting with an empty view would let the next save overwrite
/// the user's data.
fn main() -> Result<()> {
    let backend = FileStore::open_default()?;
    init_logging(backend.data_dir())?;

    let store = ShelfStore::new(backend);
    let shelf = store.get_all()?;

    let client = CatalogClient::new()?;
    let worker = CatalogWorker::spawn(client);

    let mut app = App::new(store, worker, shelf);
    run_app(&mut app)
}

/// Route tracing output to a file in the data directory, truncating the
/// previous run's log.
fn init_logging(data_dir: &Path) -> Result<()> {
    let log_file =
        File::create(data_dir.join(LOG_FILE_NAME)).context("failed to create log file")?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_max_level(Level::DEBUG)
        .init();
    Ok(())
}
