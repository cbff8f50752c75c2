//! Documents: pages plus an outline

use std::num::NonZeroUsize;
use std::thread;

use rayon::prelude::*;

use crate::grid::Page;
use crate::location::SearchResultLocation;

use super::outline::Outline;

#[derive(Clone, Debug, Default)]
pub struct Document {
    name: String,
    pages: Vec<Page>,
    outline: Outline,
}

impl Document {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add(&mut self, page: Page) {
        self.pages.push(page);
    }

    pub fn set_outline(&mut self, outline: Outline) {
        self.outline = outline;
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Generate every page grid, splitting the pages into one contiguous
    /// range per available core. Pages share nothing, so each range is
    /// handed to the pool as an exclusive slice.
    pub fn generate_grids(&mut self) {
        if self.pages.is_empty() {
            return;
        }

        let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let chunk = self.pages.len().div_ceil(workers).max(1);

        self.pages
            .par_chunks_mut(chunk)
            .for_each(|range| range.iter_mut().for_each(Page::generate_grid));
    }

    /// Every match in the document in reading order: page, then row, then
    /// column.
    pub fn search(&self, needle: &str) -> Vec<SearchResultLocation> {
        if needle.is_empty() {
            return Vec::new();
        }

        self.pages
            .iter()
            .enumerate()
            .flat_map(|(page_index, page)| {
                page.search(needle)
                    .into_iter()
                    .map(move |hit| hit.on_page(page_index))
            })
            .map(|hit| hit.in_document(self.name.as_str()))
            .collect()
    }

    /// Target page of the outline row at `select_index`
    pub fn outline_page_index_at(&self, select_index: usize) -> Option<usize> {
        self.outline.page_index_at(select_index)
    }

    pub fn outline_width(&self) -> usize {
        self.outline.width()
    }

    pub fn outline_height(&self) -> usize {
        self.outline.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Block;

    fn page(blocks: &[(f64, f64, f64, f64, &str)]) -> Page {
        let mut page = Page::new(100.0, 100.0);
        for &(left, right, top, bottom, text) in blocks {
            page.add(Block::new(left, right, top, bottom, text));
        }
        page
    }

    fn sample() -> Document {
        let mut document = Document::new("sample.pdf");
        document.add(page(&[
            (0.0, 10.0, 50.0, 60.0, "cat at the bottom"),
            (0.0, 10.0, 0.0, 10.0, "a cat on top"),
        ]));
        document.add(page(&[(0.0, 10.0, 0.0, 10.0, "no felines")]));
        document.add(page(&[(0.0, 10.0, 0.0, 10.0, "last cat")]));
        document.generate_grids();
        document
    }

    #[test]
    fn generates_every_page() {
        let document = sample();
        assert!(document.pages().iter().all(|p| p.height() > 0));
        assert_eq!(document.page(2).and_then(|p| p.line(0)).as_deref(), Some("last cat"));
    }

    #[test]
    fn search_is_in_reading_order() {
        let results = sample().search("cat");
        let order: Vec<(usize, usize, usize)> =
            results.iter().map(|r| (r.page_index, r.y, r.x)).collect();
        assert_eq!(order, vec![(0, 0, 2), (0, 2, 0), (2, 0, 5)]);
        assert!(results.iter().all(|r| r.document_name == "sample.pdf"));
        for pair in results.windows(2) {
            assert!(pair[0].reading_cmp(&pair[1]).is_lt());
        }
    }

    #[test]
    fn empty_needle_finds_nothing() {
        assert!(sample().search("").is_empty());
    }

    #[test]
    fn more_pages_than_cores_are_all_generated() {
        let mut document = Document::new("big");
        for i in 0..257 {
            document.add(page(&[(0.0, 10.0, 0.0, 10.0, format!("page {i}").as_str())]));
        }
        document.generate_grids();
        assert!(document.pages().iter().all(|p| p.width() > 0));
        assert_eq!(document.search("page").len(), 257);
    }

    #[test]
    fn outline_helpers_delegate() {
        let mut document = sample();
        let mut outline = Outline::new();
        let root = outline.add_root("One", 0);
        outline.add_child(root, "One.One", 1);
        outline.add_root("Two", 2);
        document.set_outline(outline);

        assert_eq!(document.outline_page_index_at(0), Some(0));
        assert_eq!(document.outline_page_index_at(1), Some(1));
        assert_eq!(document.outline_page_index_at(2), Some(2));
        assert_eq!(document.outline_page_index_at(3), None);
        assert_eq!(document.outline_height(), 3);
    }
}
