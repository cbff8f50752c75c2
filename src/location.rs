//! Search result locators

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// One search match: where it is in the source text and where it landed in
/// the composed page grid.
///
/// Equality and hashing only look at the source identity
/// (`document_name`, `page_index`, `block_index`, `character_index`).
/// Grid position is navigation data and there is no `Ord`;
/// use [`SearchResultLocation::grid_cmp`] or
/// [`SearchResultLocation::reading_cmp`] instead.
#[derive(Clone, Debug, Default)]
pub struct SearchResultLocation {
    pub document_name: String,
    pub page_index: usize,
    pub block_index: usize,
    /// Character-unit index into the block text
    pub character_index: usize,
    /// Column in the composed page grid
    pub x: usize,
    /// Row in the composed page grid
    pub y: usize,
}

impl SearchResultLocation {
    #[must_use]
    pub fn at_character(character_index: usize) -> Self {
        Self {
            character_index,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn in_block(mut self, block_index: usize) -> Self {
        self.block_index = block_index;
        self
    }

    #[must_use]
    pub fn at_grid(mut self, x: usize, y: usize) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    #[must_use]
    pub fn on_page(mut self, page_index: usize) -> Self {
        self.page_index = page_index;
        self
    }

    #[must_use]
    pub fn in_document(mut self, document_name: impl Into<String>) -> Self {
        self.document_name = document_name.into();
        self
    }

    /// On-screen order within one page: row, then column
    #[must_use]
    pub fn grid_cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }

    /// Whole-document reading order: page, then row, then column
    #[must_use]
    pub fn reading_cmp(&self, other: &Self) -> Ordering {
        self.page_index
            .cmp(&other.page_index)
            .then_with(|| self.grid_cmp(other))
    }
}

impl PartialEq for SearchResultLocation {
    fn eq(&self, other: &Self) -> bool {
        self.document_name == other.document_name
            && self.page_index == other.page_index
            && self.block_index == other.block_index
            && self.character_index == other.character_index
    }
}

impl Eq for SearchResultLocation {}

impl Hash for SearchResultLocation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.document_name.hash(state);
        self.page_index.hash(state);
        self.block_index.hash(state);
        self.character_index.hash(state);
    }
}
