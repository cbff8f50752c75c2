//! A page: its blocks, their layout, and the composed character grid

use crate::charwise::CharwiseExt;
use crate::location::SearchResultLocation;

use super::block::Block;
use super::layout::{self, GridOffset};
use super::{BLANK, Grid};

#[derive(Clone, Debug, Default)]
pub struct Page {
    /// Document-space size, informational only
    width: f64,
    height: f64,
    /// Extraction order, not reading order
    blocks: Vec<Block>,
    /// Cached by [`Page::generate_grid`], parallel to `blocks`
    block_offsets: Vec<GridOffset>,
    /// Cached by [`Page::generate_grid`]
    grid: Grid,
}

impl Page {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn add(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn document_width(&self) -> f64 {
        self.width
    }

    pub fn document_height(&self) -> f64 {
        self.height
    }

    /// Lay out the blocks and compose their grids into the page grid
    pub fn generate_grid(&mut self) {
        self.block_offsets = layout::locate(&self.blocks);

        self.grid = compose(&self.blocks, &self.block_offsets);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn block_offsets(&self) -> &[GridOffset] {
        &self.block_offsets
    }

    /// Grid columns
    pub fn width(&self) -> usize {
        self.grid.first().map_or(0, Vec::len)
    }

    /// Grid rows
    pub fn height(&self) -> usize {
        self.grid.len()
    }

    /// Page-grid `(x, y)` of a match inside one of this page's blocks
    pub fn locate_search_in_grid(&self, location: &SearchResultLocation) -> (usize, usize) {
        let Some(block) = self.blocks.get(location.block_index) else {
            return (0, 0);
        };
        let offset = self
            .block_offsets
            .get(location.block_index)
            .copied()
            .unwrap_or_default();
        let (x, y) = block.locate_search_in_grid(location);

        (offset.x + x, offset.y + y)
    }

    /// Matches in visual reading order (row, then column).
    ///
    /// Hits from overlapping blocks that land on the same row closer together
    /// than the needle is long render as one occurrence; only the first one
    /// found is kept.
    pub fn search(&self, needle: &str) -> Vec<SearchResultLocation> {
        let mut results: Vec<SearchResultLocation> = Vec::new();

        if needle.is_empty() {
            return results;
        }

        let needle_len = needle.unit_len();

        for (block_index, block) in self.blocks.iter().enumerate() {
            for hit in block.search(needle) {
                let hit = hit.in_block(block_index);
                let (x, y) = self.locate_search_in_grid(&hit);
                let hit = hit.at_grid(x, y);

                let duplicate = results
                    .iter()
                    .any(|kept| kept.y == hit.y && kept.x.abs_diff(hit.x) < needle_len);
                if !duplicate {
                    results.push(hit);
                }
            }
        }

        results.sort_by(SearchResultLocation::grid_cmp);
        results
    }

    /// Occurrences of `needle` in the composed grid rows, as
    /// `(y, x_start, x_end)` cell spans. Used for highlighting.
    pub fn grid_matches(&self, needle: &str) -> Vec<(usize, usize, usize)> {
        let mut spans = Vec::new();

        if needle.is_empty() {
            return spans;
        }

        let needle_len = needle.unit_len();

        for (y, row) in self.grid.iter().enumerate() {
            let line: String = row.iter().collect();
            let mut offset = 0;
            while let Some(x) = line.unit_find(needle, offset) {
                spans.push((y, x, x + needle_len));
                offset = x + needle_len;
            }
        }

        spans
    }

    /// One composed grid row as a string
    pub fn line(&self, y: usize) -> Option<String> {
        self.grid.get(y).map(|row| row.iter().collect())
    }
}

/// Write each block's grid into one page grid at its offset.
///
/// Blank source cells never overwrite a non-blank cell already written,
/// so one block's padding cannot erase another block's glyphs.
pub fn compose(blocks: &[Block], offsets: &[GridOffset]) -> Grid {
    let mut width = 0;
    let mut height = 0;
    for (block, offset) in blocks.iter().zip(offsets) {
        width = width.max(offset.x + block.width());
        height = height.max(offset.y + block.height());
    }

    let mut grid = vec![vec![BLANK; width]; height];

    for (block, offset) in blocks.iter().zip(offsets) {
        for (y, row) in block.grid().into_iter().enumerate() {
            let target = &mut grid[offset.y + y];
            for (x, cell) in row.into_iter().enumerate() {
                let slot = &mut target[offset.x + x];
                if cell == BLANK && *slot != BLANK {
                    continue;
                }
                *slot = cell;
            }
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello_world() -> Page {
        let mut page = Page::new(100.0, 100.0);
        page.add(Block::new(0.0, 5.0, 0.0, 1.0, "Hello"));
        page.add(Block::new(10.0, 15.0, 0.0, 1.0, "World"));
        page.generate_grid();
        page
    }

    #[test]
    fn composes_two_aligned_blocks() {
        let page = hello_world();
        assert_eq!(page.width(), 14);
        assert_eq!(page.height(), 1);
        assert_eq!(page.line(0).as_deref(), Some("Hello    World"));
        assert_eq!(
            page.block_offsets(),
            &[GridOffset::new(0, 0), GridOffset::new(9, 0)]
        );
    }

    #[test]
    fn empty_page_has_empty_grid() {
        let mut page = Page::new(10.0, 10.0);
        page.generate_grid();
        assert_eq!(page.width(), 0);
        assert_eq!(page.height(), 0);
        assert!(page.search("x").is_empty());
    }

    #[test]
    fn search_resolves_grid_positions() {
        let page = hello_world();
        let results = page.search("o");
        let cells: Vec<(usize, usize)> = results.iter().map(|r| (r.x, r.y)).collect();
        assert_eq!(cells, vec![(4, 0), (10, 0)]);
        assert_eq!(results[1].block_index, 1);
        assert_eq!(results[1].character_index, 1);
    }

    #[test]
    fn empty_needle_yields_nothing() {
        assert!(hello_world().search("").is_empty());
        assert!(hello_world().grid_matches("").is_empty());
    }

    #[test]
    fn results_follow_grid_order_not_block_order() {
        let mut page = Page::new(100.0, 100.0);
        page.add(Block::new(0.0, 10.0, 50.0, 60.0, "needle below"));
        page.add(Block::new(0.0, 10.0, 0.0, 10.0, "needle above"));
        page.generate_grid();

        let results = page.search("needle");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].block_index, 1);
        assert_eq!(results[1].block_index, 0);
        assert!(results[0].y < results[1].y);
    }

    #[test]
    fn visually_coincident_hits_are_merged() {
        let page = Page {
            blocks: vec![
                Block::new(0.0, 10.0, 0.0, 10.0, "find me"),
                Block::new(0.0, 10.0, 0.0, 10.0, "find me"),
            ],
            block_offsets: vec![GridOffset::new(0, 0), GridOffset::new(1, 0)],
            ..Page::default()
        };

        let results = page.search("find");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].block_index, 0);
    }

    #[test]
    fn surviving_results_never_overlap() {
        let mut page = Page::new(100.0, 100.0);
        page.add(Block::new(0.0, 20.0, 0.0, 10.0, "abab abab"));
        page.add(Block::new(30.0, 50.0, 0.0, 10.0, "ab\nab ab"));
        page.add(Block::new(0.0, 50.0, 20.0, 30.0, "xxabxx"));
        page.generate_grid();

        let results = page.search("ab");
        for (i, a) in results.iter().enumerate() {
            for b in &results[i + 1..] {
                assert!(a.y != b.y || a.x.abs_diff(b.x) >= 2);
            }
        }
        for pair in results.windows(2) {
            assert!((pair[0].y, pair[0].x) < (pair[1].y, pair[1].x));
        }
    }

    #[test]
    fn blank_padding_does_not_erase_glyphs() {
        let blocks = vec![
            Block::new(0.0, 10.0, 0.0, 10.0, "abc"),
            Block::new(0.0, 10.0, 0.0, 10.0, "x\nyyyy"),
        ];
        let grid = compose(&blocks, &[GridOffset::new(0, 0), GridOffset::new(0, 0)]);
        assert_eq!(grid[0], vec!['x', 'b', 'c', ' ']);
        assert_eq!(grid[1], vec!['y', 'y', 'y', 'y']);
    }

    #[test]
    fn overlapping_boxes_keep_all_text() {
        let mut page = Page::new(10.0, 10.0);
        page.add(Block::new(0.0, 10.0, 0.0, 10.0, "abc"));
        page.add(Block::new(0.0, 10.0, 0.0, 10.0, "x\nyyyy"));
        page.generate_grid();

        let composed: Vec<String> = (0..page.height()).filter_map(|y| page.line(y)).collect();
        assert!(composed.iter().any(|l| l.contains("abc")));
        assert!(composed.iter().any(|l| l.contains("yyyy")));
    }

    #[test]
    fn grid_matches_scan_composed_rows() {
        let page = hello_world();
        assert_eq!(page.grid_matches("o"), vec![(0, 4, 5), (0, 10, 11)]);
        assert_eq!(page.grid_matches("o    W"), vec![(0, 4, 10)]);
    }
}
