use crate::models::{BookRecord, StatusFilter, WorkDetails};

/// State for the persistent shelf view: the records currently on screen
/// (already filtered by the store), the active filter, and the selection.
pub(crate) struct ShelfScreen {
    pub(crate) records: Vec<BookRecord>,
    pub(crate) filter: StatusFilter,
    pub(crate) selected: usize,
}

impl ShelfScreen {
    pub(crate) fn new(records: Vec<BookRecord>) -> Self {
        Self {
            records,
            filter: StatusFilter::default(),
            selected: 0,
        }
    }

    /// Swap in a freshly loaded record list, clamping the selection so it
    /// never points past the end.
    pub(crate) fn set_records(&mut self, records: Vec<BookRecord>) {
        self.records = records;
        self.ensure_in_bounds();
    }

    pub(crate) fn current(&self) -> Option<&BookRecord> {
        self.records.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        move_clamped(&mut self.selected, offset, self.records.len());
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.records.len().saturating_sub(1);
    }

    pub(crate) fn ensure_in_bounds(&mut self) {
        if self.records.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.records.len() {
            self.selected = self.records.len() - 1;
        }
    }
}

/// State for the transient search view. `searched` distinguishes "no search
/// submitted yet" from "the last search came back empty" so the empty-state
/// message can be honest about which one happened.
pub(crate) struct SearchScreen {
    pub(crate) query: String,
    pub(crate) results: Vec<BookRecord>,
    pub(crate) selected: usize,
    pub(crate) loading: bool,
    pub(crate) searched: bool,
}

impl SearchScreen {
    pub(crate) fn new() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            selected: 0,
            loading: false,
            searched: false,
        }
    }

    pub(crate) fn set_results(&mut self, results: Vec<BookRecord>) {
        self.results = results;
        self.selected = 0;
        self.loading = false;
        self.searched = true;
    }

    pub(crate) fn current(&self) -> Option<&BookRecord> {
        self.results.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        move_clamped(&mut self.selected, offset, self.results.len());
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.results.len().saturating_sub(1);
    }
}

/// Body of the detail modal, tracking the fetch lifecycle.
pub(crate) enum DetailBody {
    Loading,
    Loaded(WorkDetails),
    Failed,
}

/// State for the detail modal. The olid and title come from the record the
/// user opened, so the modal has something to show while the fetch is in
/// flight (and something to link to if it fails).
pub(crate) struct DetailState {
    pub(crate) olid: String,
    pub(crate) title: String,
    pub(crate) body: DetailBody,
}

impl DetailState {
    pub(crate) fn loading(record: &BookRecord) -> Self {
        Self {
            olid: record.olid.clone(),
            title: record.title.clone(),
            body: DetailBody::Loading,
        }
    }
}

/// Clamp-style selection movement shared by both list screens.
fn move_clamped(selected: &mut usize, offset: isize, len: usize) {
    if len == 0 {
        *selected = 0;
        return;
    }
    let len = len as isize;
    let mut new = *selected as isize + offset;
    if new < 0 {
        new = 0;
    }
    if new >= len {
        new = len - 1;
    }
    *selected = new as usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_clamps_at_both_ends() {
        let mut selected = 2usize;
        move_clamped(&mut selected, -10, 5);
        assert_eq!(selected, 0);
        move_clamped(&mut selected, 10, 5);
        assert_eq!(selected, 4);
    }

    #[test]
    fn selection_resets_on_empty_list() {
        let mut selected = 3usize;
        move_clamped(&mut selected, 1, 0);
        assert_eq!(selected, 0);
    }
}
