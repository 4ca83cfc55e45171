//! Catalog access split across logical submodules: the blocking HTTP client
//! and the worker thread that keeps it off the event loop.

mod client;
mod worker;

pub use client::CatalogClient;
pub use worker::{CatalogEvent, CatalogWorker};
