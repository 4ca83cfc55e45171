//! Domain models shared between the shelf store, the catalog client, and the
//! TUI. The intent is that these types stay light-weight data holders so the
//! other layers can focus on persistence and presentation logic. Keeping the
//! commentary here means later refactors can reconstruct the assumptions even
//! if other context is lost.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reading status stamped onto a record the moment it is saved to the shelf.
/// A record without a status is a transient search result, never a shelf
/// entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingStatus {
    #[serde(rename = "read")]
    Read,
    #[serde(rename = "want-to-read")]
    WantToRead,
}

impl ReadingStatus {
    /// Flip between the two statuses. The UI exposes status changes as a
    /// single toggle key, so the transition lives on the type rather than in
    /// the view code.
    pub fn toggled(self) -> Self {
        match self {
            ReadingStatus::Read => ReadingStatus::WantToRead,
            ReadingStatus::WantToRead => ReadingStatus::Read,
        }
    }
}

impl fmt::Display for ReadingStatus {
    /// Human-readable label used in cards and the footer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingStatus::Read => write!(f, "Read"),
            ReadingStatus::WantToRead => write!(f, "Want to Read"),
        }
    }
}

/// Filter applied to the shelf view. `All` shows every saved record; the
/// other two narrow the view to a single status without changing what is
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    WantToRead,
    Read,
}

impl StatusFilter {
    /// Advance to the next filter in display order (All, Want to Read, Read).
    pub fn cycled(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::WantToRead,
            StatusFilter::WantToRead => StatusFilter::Read,
            StatusFilter::Read => StatusFilter::All,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "All"),
            StatusFilter::WantToRead => write!(f, "Want to Read"),
            StatusFilter::Read => write!(f, "Read"),
        }
    }
}

/// One book entry, either a search result passing through the UI or a durable
/// shelf entry once the store stamps a status. The serde renames keep the
/// persisted JSON field names stable so a shelf file written by any build of
/// the app loads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Opaque catalog identifier (the Open Library `key`). Unique across the
    /// shelf; uniqueness is enforced by the store, not here.
    pub id: String,
    pub title: String,
    /// Comma-joined display form, already normalized by the catalog client.
    pub authors: String,
    /// Short description or a placeholder inviting the user to open details.
    pub description: String,
    /// Cover URL, or a fixed placeholder when the catalog has none.
    pub cover_image: String,
    /// First publish year as display text, or a placeholder.
    pub published_date: String,
    /// Work identifier derived from `id` by stripping the `/works/` prefix.
    /// Kept separately because the detail endpoint and browser links want the
    /// bare form.
    pub olid: String,
    /// Comma-joined subject list, or "Not specified".
    pub subject: String,
    /// Absent until the record is saved to the shelf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReadingStatus>,
}

impl BookRecord {
    /// URL of the work's page on the catalog website, used by the
    /// open-in-browser shortcut.
    pub fn catalog_url(&self) -> String {
        format!("https://openlibrary.org/works/{}", self.olid)
    }
}

/// Expanded details for a single work as shown in the modal, already
/// normalized with display fallbacks by the catalog client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDetails {
    pub title: String,
    pub description: String,
    /// Comma-joined subject list.
    pub subjects: String,
    pub cover_image: String,
}
