use crate::models::BookRecord;

/// Input state for the search query bar.
#[derive(Default, Clone)]
pub(crate) struct SearchInput {
    pub(crate) query: String,
}

impl SearchInput {
    /// Seed the bar with the previously submitted query so re-editing a
    /// search does not start from scratch.
    pub(crate) fn with_query(query: &str) -> Self {
        Self {
            query: query.to_string(),
        }
    }

    /// Append a printable character; control characters are ignored.
    pub(crate) fn push_char(&mut self, ch: char) {
        if !ch.is_control() {
            self.query.push(ch);
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.query.pop();
    }

    /// The query ready for submission, or `None` when it is blank. A blank
    /// query must never reach the catalog client.
    pub(crate) fn submitted(&self) -> Option<String> {
        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// State for confirming removal of a shelf entry. Carries the display title
/// so the dialog can name what is about to disappear.
pub(crate) struct ConfirmRemove {
    pub(crate) id: String,
    pub(crate) title: String,
}

impl ConfirmRemove {
    pub(crate) fn from_record(record: &BookRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
        }
    }
}
