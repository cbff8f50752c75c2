//! The set of open documents, each paired with its own view

use log::{debug, info};

use crate::document::Document;

use super::state::{Command, DocumentView, Effect};

/// One open document and its cursor
#[derive(Clone, Debug)]
pub struct OpenDocument {
    pub document: Document,
    pub view: DocumentView,
}

impl OpenDocument {
    pub fn name(&self) -> &str {
        self.document.name()
    }

    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        self.view.apply(&self.document, cmd)
    }
}

/// Open documents kept sorted by name so cycling order is deterministic.
/// Names are unique keys; opening a name twice replaces the earlier entry.
#[derive(Clone, Debug, Default)]
pub struct Workspace {
    entries: Vec<OpenDocument>,
    active: usize,
}

impl Workspace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a loaded document and make it the active one
    pub fn open(&mut self, document: Document) {
        let entry = OpenDocument {
            document,
            view: DocumentView::new(),
        };

        match self
            .entries
            .binary_search_by(|probe| probe.name().cmp(entry.name()))
        {
            Ok(index) => {
                info!("Reopening {}", entry.name());
                self.entries[index] = entry;
                self.active = index;
            }
            Err(index) => {
                debug!("Opening {} at position {index}", entry.name());
                self.entries.insert(index, entry);
                self.active = index;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(OpenDocument::name)
    }

    pub fn active_index(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.active)
    }

    pub fn active(&self) -> Option<&OpenDocument> {
        self.entries.get(self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut OpenDocument> {
        self.entries.get_mut(self.active)
    }

    /// Make the named document active. Unknown names are ignored.
    pub fn activate(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|e| e.name() == name) {
            Some(index) => {
                self.active = index;
                true
            }
            None => false,
        }
    }

    /// Cycle forward, wrapping past the last document
    pub fn next_document(&mut self) {
        if !self.entries.is_empty() {
            self.active = (self.active + 1) % self.entries.len();
        }
    }

    /// Cycle backward, wrapping past the first document
    pub fn previous_document(&mut self) {
        if !self.entries.is_empty() {
            self.active = self
                .active
                .checked_sub(1)
                .unwrap_or(self.entries.len() - 1);
        }
    }

    /// Route a command to the active document's view
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        self.active_mut()
            .map(|entry| entry.apply(cmd))
            .unwrap_or_default()
    }
}
