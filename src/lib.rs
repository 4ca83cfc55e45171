//! Core library surface for the Bookshelf Tracker TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces. Keeping the glue logic documented makes it easy to recall why each
//! re-export exists when revisiting the project.
pub mod catalog;
pub mod models;
pub mod storage;
pub mod ui;

/// Convenience re-exports for the persistence layer. `main.rs` uses these to
/// open the file-backed store and preload the shelf.
pub use storage::{FileStore, ShelfStore, StorageBackend};

/// Catalog access: the blocking client plus the worker thread that keeps it
/// off the event loop.
pub use catalog::{CatalogClient, CatalogWorker};

/// The primary domain types that other layers manipulate.
pub use models::{BookRecord, ReadingStatus, StatusFilter, WorkDetails};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
