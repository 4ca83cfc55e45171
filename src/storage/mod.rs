//! Persistence module split across logical submodules.

mod backend;
mod shelf;

pub use backend::{FileStore, MemoryStore, StorageBackend};
pub use shelf::{CorruptShelf, ShelfStore, STORAGE_KEY};
