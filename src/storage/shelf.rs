//! The shelf store: sole owner of the persisted, ordered collection of book
//! records. Every function here encapsulates one operation over the whole
//! sequence so the rest of the codebase can stay focused on UI state
//! management. Capturing the ordering rules in comments keeps the intent of
//! each operation easy to rediscover when returning to the project.

use anyhow::{Context, Result};
use thiserror::Error;

use crate::models::{BookRecord, ReadingStatus, StatusFilter};

use super::backend::StorageBackend;

/// Fixed key the record array is persisted under. Several code paths (the
/// store itself, integration tests, manual inspection of the data directory)
/// rely on the exact same string.
pub const STORAGE_KEY: &str = "bookshelf_books";

/// The persisted blob exists but does not parse as a record array. Kept as a
/// distinct type so callers can tell corruption apart from plain I/O errors:
/// the shelf file still holds the user's data and must not be overwritten by
/// a well-meaning retry.
#[derive(Debug, Error)]
#[error("persisted shelf data is corrupt")]
pub struct CorruptShelf(#[from] serde_json::Error);

/// Owns every read and mutation of the persisted shelf. Operations run to
/// completion synchronously; domain-level rejections (blank ids, duplicates,
/// unknown ids) come back as `Ok(false)` with storage untouched, while
/// storage failures propagate as errors. Each successful mutation persists
/// the full sequence exactly once.
pub struct ShelfStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> ShelfStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Read the full shelf in display order. An unwritten store is an empty
    /// shelf; a written-but-unparsable one is an error, never silently
    /// discarded data.
    pub fn get_all(&self) -> Result<Vec<BookRecord>> {
        let Some(raw) = self.backend.read(STORAGE_KEY)? else {
            return Ok(Vec::new());
        };
        let records = serde_json::from_str(&raw)
            .map_err(CorruptShelf::from)
            .context("failed to load shelf")?;
        Ok(records)
    }

    /// Append `record` to the end of the shelf, stamping `status` (defaulted
    /// to want-to-read). Returns false without touching storage when the
    /// record has no id or the id is already shelved; existing entries keep
    /// their positions either way.
    pub fn save(&self, record: &BookRecord, status: Option<ReadingStatus>) -> Result<bool> {
        if record.id.is_empty() {
            return Ok(false);
        }
        let mut records = self.get_all()?;
        if records.iter().any(|r| r.id == record.id) {
            return Ok(false);
        }
        let mut saved = record.clone();
        saved.status = Some(status.unwrap_or(ReadingStatus::WantToRead));
        records.push(saved);
        self.persist(&records)?;
        Ok(true)
    }

    /// Delete the record with `id`, preserving the relative order of the
    /// survivors. False when the id is blank or not on the shelf.
    pub fn remove(&self, id: &str) -> Result<bool> {
        if id.is_empty() {
            return Ok(false);
        }
        let mut records = self.get_all()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.persist(&records)?;
        Ok(true)
    }

    /// Change only the status of the record with `id`; its position in the
    /// sequence is untouched.
    pub fn update_status(&self, id: &str, status: ReadingStatus) -> Result<bool> {
        if id.is_empty() {
            return Ok(false);
        }
        let mut records = self.get_all()?;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        record.status = Some(status);
        self.persist(&records)?;
        Ok(true)
    }

    /// Return the shelf entries matching `filter` in stored order. `All` is
    /// the unfiltered shelf.
    pub fn filter_by_status(&self, filter: StatusFilter) -> Result<Vec<BookRecord>> {
        let records = self.get_all()?;
        let wanted = match filter {
            StatusFilter::All => return Ok(records),
            StatusFilter::Read => ReadingStatus::Read,
            StatusFilter::WantToRead => ReadingStatus::WantToRead,
        };
        Ok(records
            .into_iter()
            .filter(|r| r.status == Some(wanted))
            .collect())
    }

    /// Move the record `source_id` so it sits immediately before `target_id`.
    /// False when either id is blank, the ids are equal, or either is not on
    /// the shelf.
    ///
    /// The target is re-located by id after the source is removed: removing
    /// the source shifts every later index down by one, so the pre-removal
    /// target index must not be reused.
    pub fn reorder(&self, source_id: &str, target_id: &str) -> Result<bool> {
        if source_id.is_empty() || target_id.is_empty() || source_id == target_id {
            return Ok(false);
        }
        let mut records = self.get_all()?;
        let Some(source_index) = records.iter().position(|r| r.id == source_id) else {
            return Ok(false);
        };
        if !records.iter().any(|r| r.id == target_id) {
            return Ok(false);
        }

        let source = records.remove(source_index);
        let Some(target_index) = records.iter().position(|r| r.id == target_id) else {
            return Ok(false);
        };
        records.insert(target_index, source);

        self.persist(&records)?;
        Ok(true)
    }

    /// Serialize and write the whole sequence in one step. The backend
    /// guarantees the write is all-or-nothing.
    fn persist(&self, records: &[BookRecord]) -> Result<()> {
        let raw = serde_json::to_string(records).context("failed to serialize shelf")?;
        self.backend
            .write(STORAGE_KEY, &raw)
            .context("failed to persist shelf")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::storage::backend::MemoryStore;

    use super::*;

    fn record(id: &str) -> BookRecord {
        BookRecord {
            id: format!("/works/{id}"),
            title: format!("Title {id}"),
            authors: "Some Author".to_string(),
            description: "Click for more details".to_string(),
            cover_image: "https://covers.openlibrary.org/b/id/1-M.jpg".to_string(),
            published_date: "1999".to_string(),
            olid: id.to_string(),
            subject: "Fiction".to_string(),
            status: None,
        }
    }

    fn store() -> ShelfStore<MemoryStore> {
        ShelfStore::new(MemoryStore::default())
    }

    fn shelved(store: &ShelfStore<MemoryStore>, ids: &[&str]) {
        for id in ids {
            assert!(store.save(&record(id), None).unwrap());
        }
    }

    fn ids(records: &[BookRecord]) -> Vec<String> {
        records.iter().map(|r| r.olid.clone()).collect()
    }

    #[test]
    fn empty_store_reads_as_empty_shelf() {
        assert_eq!(store().get_all().unwrap(), Vec::new());
    }

    #[test]
    fn save_defaults_status_to_want_to_read() {
        let store = store();
        assert!(store.save(&record("A"), None).unwrap());

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, Some(ReadingStatus::WantToRead));
    }

    #[test]
    fn save_keeps_explicit_status() {
        let store = store();
        assert!(store
            .save(&record("A"), Some(ReadingStatus::Read))
            .unwrap());

        assert_eq!(
            store.get_all().unwrap()[0].status,
            Some(ReadingStatus::Read)
        );
    }

    #[test]
    fn save_rejects_duplicate_id() {
        let store = store();
        assert!(store.save(&record("A"), None).unwrap());
        assert!(!store.save(&record("A"), Some(ReadingStatus::Read)).unwrap());

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 1);
        // The original entry is untouched, including its status.
        assert_eq!(all[0].status, Some(ReadingStatus::WantToRead));
    }

    #[test]
    fn save_rejects_blank_id() {
        let store = store();
        let mut blank = record("A");
        blank.id = String::new();
        assert!(!store.save(&blank, None).unwrap());
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn save_appends_at_the_tail() {
        let store = store();
        shelved(&store, &["A", "B", "C"]);
        assert_eq!(ids(&store.get_all().unwrap()), ["A", "B", "C"]);
    }

    #[test]
    fn remove_preserves_relative_order() {
        let store = store();
        shelved(&store, &["A", "B", "C", "D"]);

        assert!(store.remove("/works/B").unwrap());
        assert_eq!(ids(&store.get_all().unwrap()), ["A", "C", "D"]);
    }

    #[test]
    fn remove_unknown_id_leaves_store_unchanged() {
        let store = store();
        shelved(&store, &["A", "B"]);

        assert!(!store.remove("/works/Z").unwrap());
        assert!(!store.remove("").unwrap());
        assert_eq!(ids(&store.get_all().unwrap()), ["A", "B"]);
    }

    #[test]
    fn update_status_changes_only_the_target() {
        let store = store();
        shelved(&store, &["A", "B", "C"]);

        assert!(store
            .update_status("/works/B", ReadingStatus::Read)
            .unwrap());

        let all = store.get_all().unwrap();
        assert_eq!(ids(&all), ["A", "B", "C"]);
        assert_eq!(all[0].status, Some(ReadingStatus::WantToRead));
        assert_eq!(all[1].status, Some(ReadingStatus::Read));
        assert_eq!(all[2].status, Some(ReadingStatus::WantToRead));
    }

    #[test]
    fn update_status_unknown_id_fails() {
        let store = store();
        shelved(&store, &["A"]);
        assert!(!store
            .update_status("/works/Z", ReadingStatus::Read)
            .unwrap());
        assert!(!store.update_status("", ReadingStatus::Read).unwrap());
    }

    #[test]
    fn filter_all_returns_full_sequence_in_order() {
        let store = store();
        shelved(&store, &["A", "B", "C"]);
        store.update_status("/works/B", ReadingStatus::Read).unwrap();

        assert_eq!(
            ids(&store.filter_by_status(StatusFilter::All).unwrap()),
            ["A", "B", "C"]
        );
    }

    #[test]
    fn filter_by_single_status_keeps_stored_order() {
        let store = store();
        shelved(&store, &["A", "B", "C", "D"]);
        store.update_status("/works/A", ReadingStatus::Read).unwrap();
        store.update_status("/works/C", ReadingStatus::Read).unwrap();

        assert_eq!(
            ids(&store.filter_by_status(StatusFilter::Read).unwrap()),
            ["A", "C"]
        );
        assert_eq!(
            ids(&store.filter_by_status(StatusFilter::WantToRead).unwrap()),
            ["B", "D"]
        );
    }

    #[test]
    fn reorder_moves_source_before_target() {
        let store = store();
        shelved(&store, &["A", "B", "C", "D"]);

        // Source precedes target: removal shifts the target left, so the
        // store must re-find it instead of reusing the old index.
        assert!(store.reorder("/works/A", "/works/C").unwrap());
        assert_eq!(ids(&store.get_all().unwrap()), ["B", "A", "C", "D"]);
    }

    #[test]
    fn reorder_moves_later_record_to_the_front() {
        let store = store();
        shelved(&store, &["A", "B", "C", "D"]);

        assert!(store.reorder("/works/D", "/works/A").unwrap());
        assert_eq!(ids(&store.get_all().unwrap()), ["D", "A", "B", "C"]);
    }

    #[test]
    fn reorder_rejects_self_and_unknown_ids() {
        let store = store();
        shelved(&store, &["A", "B"]);

        assert!(!store.reorder("/works/A", "/works/A").unwrap());
        assert!(!store.reorder("/works/Z", "/works/A").unwrap());
        assert!(!store.reorder("/works/A", "/works/Z").unwrap());
        assert!(!store.reorder("", "/works/A").unwrap());
        assert!(!store.reorder("/works/A", "").unwrap());
        assert_eq!(ids(&store.get_all().unwrap()), ["A", "B"]);
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let store = store();
        shelved(&store, &["A", "B", "C"]);
        store.update_status("/works/C", ReadingStatus::Read).unwrap();

        let first = store.get_all().unwrap();
        let second = store.get_all().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn corrupt_blob_fails_loudly() {
        let backend = MemoryStore::default();
        backend.write(STORAGE_KEY, "not json at all").unwrap();

        let store = ShelfStore::new(backend);
        let err = store.get_all().unwrap_err();
        assert!(err.chain().any(|cause| cause.is::<CorruptShelf>()));
    }

    #[test]
    fn status_absent_in_json_loads_as_transient_record() {
        let backend = MemoryStore::default();
        backend.write(
            STORAGE_KEY,
            r#"[{"id":"/works/X","title":"T","authors":"A","description":"D",
                 "coverImage":"c","publishedDate":"2001","olid":"X","subject":"S"}]"#,
        )
        .unwrap();

        let store = ShelfStore::new(backend);
        let all = store.get_all().unwrap();
        assert_eq!(all[0].status, None);
    }
}
