//! What one screen shows, independent of the terminal backend

use std::ops::Range;

use crate::charwise::CharwiseExt;
use crate::grid::Page;

use super::state::{DocumentView, SearchDirection};
use super::workspace::OpenDocument;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellClass {
    #[default]
    Plain,
    /// Part of any occurrence of the search string
    Highlighted,
    /// Part of the current search result, or the selected outline row
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameCell {
    pub ch: char,
    pub class: CellClass,
}

/// A viewport-sized window of the active page or outline plus a status line
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub rows: Vec<Vec<FrameCell>>,
    pub status: String,
}

impl Frame {
    pub fn build(entry: &OpenDocument) -> Self {
        let view = &entry.view;
        let rows = if view.viewing_outline {
            outline_rows(entry)
        } else {
            entry
                .document
                .page(view.page_index)
                .map(|page| page_rows(page, view))
                .unwrap_or_default()
        };

        Self {
            rows,
            status: status_line(entry),
        }
    }

    /// Frame shown when nothing could be opened
    pub fn empty(status: impl Into<String>) -> Self {
        Self {
            rows: Vec::new(),
            status: status.into(),
        }
    }

    /// Text of one row, for tests and debugging
    pub fn row_text(&self, y: usize) -> Option<String> {
        self.rows.get(y).map(|row| row.iter().map(|c| c.ch).collect())
    }
}

fn window(start: usize, len: usize, total: usize) -> Range<usize> {
    let start = start.min(total);
    start..(start + len).min(total)
}

fn page_rows(page: &Page, view: &DocumentView) -> Vec<Vec<FrameCell>> {
    let grid = page.grid();
    let rows = window(view.scroll_index, view.viewport.height, grid.len());

    let highlights = if view.search_active() {
        page.grid_matches(&view.search_query)
    } else {
        Vec::new()
    };

    let needle_len = view.search_query.unit_len();
    let active = view
        .current_search_result()
        .filter(|r| r.page_index == view.page_index)
        .map(|r| (r.y, r.x..r.x + needle_len));

    rows.map(|y| {
        let row = &grid[y];
        window(view.pan_index, view.viewport.width, row.len())
            .map(|x| {
                let class = if active
                    .as_ref()
                    .is_some_and(|(ay, span)| *ay == y && span.contains(&x))
                {
                    CellClass::Active
                } else if highlights
                    .iter()
                    .any(|&(hy, start, end)| hy == y && (start..end).contains(&x))
                {
                    CellClass::Highlighted
                } else {
                    CellClass::Plain
                };
                FrameCell { ch: row[x], class }
            })
            .collect()
    })
    .collect()
}

fn outline_rows(entry: &OpenDocument) -> Vec<Vec<FrameCell>> {
    let view = &entry.view;
    let lines = entry.document.outline().lines();
    let rows = window(view.outline_scroll_index, view.viewport.height, lines.len());

    rows.map(|y| {
        let class = if y == view.outline_select_index {
            CellClass::Active
        } else {
            CellClass::Plain
        };
        let units: Vec<char> = lines[y].units().collect();
        units[window(view.outline_pan_index, view.viewport.width, units.len())]
            .iter()
            .map(|&ch| FrameCell { ch, class })
            .collect()
    })
    .collect()
}

fn status_line(entry: &OpenDocument) -> String {
    let view = &entry.view;
    let count = entry.document.page_count();
    let page = if count == 0 { 0 } else { view.page_index + 1 };

    let mut status = format!("{} ({page}/{count})", entry.name());

    if view.search_active() {
        let prefix = match view.search_direction {
            SearchDirection::Forward => '/',
            SearchDirection::Backward => '?',
        };
        let total = view.search_results.len();
        let current = if total == 0 { 0 } else { view.search_result_index + 1 };
        status.push_str(&format!(" {prefix}{} [{current}/{total}]", view.search_query));
    }

    if view.viewing_outline {
        status.push_str(" [outline]");
    }

    status
}
