//! Positioned text blocks

use crate::charwise::CharwiseExt;
use crate::location::SearchResultLocation;

use super::{BLANK, Grid};

/// A rectangle of extracted text in document space
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    text: String,
}

impl Block {
    /// Create a block. Swapped edges are normalised so that
    /// `left <= right` and `top <= bottom` always hold.
    #[must_use]
    pub fn new(left: f64, right: f64, top: f64, bottom: f64, text: impl Into<String>) -> Self {
        Self {
            left: left.min(right),
            right: left.max(right),
            top: top.min(bottom),
            bottom: top.max(bottom),
            text: text.into(),
        }
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character units in the longest line
    pub fn width(&self) -> usize {
        self.text.split('\n').map(str::unit_len).max().unwrap_or(0)
    }

    /// Number of newline-separated lines
    pub fn height(&self) -> usize {
        self.text.matches('\n').count() + 1
    }

    /// Every non-overlapping occurrence of `needle`, left to right.
    ///
    /// Only `character_index` is filled in; the page stamps the rest.
    pub fn search(&self, needle: &str) -> Vec<SearchResultLocation> {
        let mut results = Vec::new();

        if needle.is_empty() {
            return results;
        }

        let step = needle.unit_len();
        let mut offset = 0;

        while let Some(index) = self.text.unit_find(needle, offset) {
            results.push(SearchResultLocation::at_character(index));
            offset = index + step;
        }

        results
    }

    /// The text as a `height x width` matrix, right-padded with blanks
    pub fn grid(&self) -> Grid {
        let width = self.width();

        self.text
            .split('\n')
            .map(|line| {
                let mut row: Vec<char> = line.units().collect();
                row.resize(width, BLANK);
                row
            })
            .collect()
    }

    /// Convert a character index into `(x, y)` local to this block's grid
    pub fn locate_search_in_grid(&self, location: &SearchResultLocation) -> (usize, usize) {
        let mut x = 0;
        let mut y = 0;

        for c in self.text.units().take(location.character_index) {
            if c == '\n' {
                x = 0;
                y += 1;
            } else {
                x += 1;
            }
        }

        (x, y)
    }
}
