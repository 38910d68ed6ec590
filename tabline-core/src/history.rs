//! Submitted-line history with older/newer navigation.
//!
//! Browsing starts from the newest entry. The line being edited when browsing
//! began is kept as a draft and handed back once navigation walks past the
//! newest entry again.

use crate::token::is_blank;

/// In-memory history of submitted lines, oldest first.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: Vec<String>,
    /// `None` while not browsing.
    index: Option<usize>,
    pending: String,
    max_entries: usize,
}

impl HistoryBuffer {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: None,
            pending: String::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Record a submitted line, skipping blanks and consecutive duplicates.
    ///
    /// Always ends browsing and discards the draft.
    pub fn submit(&mut self, line: &str) {
        self.reset_navigation();
        if is_blank(line) {
            return;
        }
        if self.entries.last().map(String::as_str) == Some(line) {
            return;
        }
        self.entries.push(line.to_string());
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
    }

    /// Step toward older entries. Returns the entry to display, or `None` when
    /// there is nothing older.
    ///
    /// `current` is saved as the draft when browsing begins.
    pub fn older(&mut self, current: &str) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        match self.index {
            None => {
                self.pending = current.to_string();
                self.index = Some(self.entries.len() - 1);
            }
            Some(0) => return None,
            Some(ref mut idx) => *idx -= 1,
        }
        self.index.map(|i| self.entries[i].as_str())
    }

    /// Step toward newer entries. Past the newest entry the draft comes back.
    pub fn newer(&mut self) -> Option<String> {
        let idx = self.index?;
        if idx + 1 >= self.entries.len() {
            self.index = None;
            Some(std::mem::take(&mut self.pending))
        } else {
            self.index = Some(idx + 1);
            Some(self.entries[idx + 1].clone())
        }
    }

    /// Stop browsing and drop the draft.
    pub fn reset_navigation(&mut self) {
        self.index = None;
        self.pending.clear();
    }

    pub fn is_browsing(&self) -> bool {
        self.index.is_some()
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(500)
    }
}
