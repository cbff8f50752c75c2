//! Per-document navigation state
//!
//! A [`DocumentView`] is pure state: it is changed only through
//! [`DocumentView::apply`], which clamps every index instead of failing and
//! reports what changed as a list of [`Effect`]s.

use log::debug;

use crate::charwise::CharwiseExt;
use crate::document::Document;
use crate::location::SearchResultLocation;

/// Visible area of the page, in cells. Supplied before every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// Cursor state for one open document
#[derive(Clone, Debug, Default)]
pub struct DocumentView {
    pub page_index: usize,
    pub scroll_index: usize,
    pub pan_index: usize,

    pub search_query: String,
    pub search_direction: SearchDirection,
    pub search_result_index: usize,
    pub search_results: Vec<SearchResultLocation>,

    pub viewing_outline: bool,
    pub outline_select_index: usize,
    pub outline_scroll_index: usize,
    pub outline_pan_index: usize,

    pub viewport: Viewport,
}

/// Navigation commands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Update the visible area and re-clamp scroll/pan
    SetViewport(Viewport),
    /// First page, top row
    GoToStartOfDocument,
    /// Last page, bottom row
    GoToEndOfDocument,
    GoToStartOfPage,
    GoToEndOfPage,
    PreviousPage,
    NextPage,
    ScrollUp,
    ScrollDown,
    PanLeft,
    PanRight,
    /// Jump to a 1-based page number typed by the user
    GoToPageNumber(String),

    ToggleOutline,
    OutlinePrevious,
    OutlineNext,
    OutlineHalfPageUp,
    OutlineHalfPageDown,
    OutlinePageUp,
    OutlinePageDown,
    OutlineFirst,
    OutlineLast,
    OutlinePanLeft,
    OutlinePanRight,
    /// Leave the outline and open the selected bookmark's page
    ActivateOutline,

    /// Recompute results and pick the nearest one without moving
    Search {
        query: String,
        direction: SearchDirection,
    },
    /// Bring the current result into view
    ShowSearchResult,
    /// Advance to the following result (wrapping) and bring it into view
    NextSearchResult,
    /// Advance to the preceding result (wrapping) and bring it into view
    PreviousSearchResult,
}

/// Effects produced by state changes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// The active page changed
    PageChanged(usize),
    /// Scroll or pan moved
    ViewMoved,
    /// Switched between page and outline mode
    ModeChanged { outline: bool },
    /// A different outline row is selected
    OutlineSelected(usize),
    /// New search results are in place
    SearchUpdated { matches: usize },
    /// A result became the current one
    SearchResultSelected(usize),
    /// The viewport was resized
    ViewportResized,
}

impl DocumentView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a command and return resulting effects
    pub fn apply(&mut self, document: &Document, cmd: Command) -> Vec<Effect> {
        let mut effects = Vec::new();

        match cmd {
            Command::SetViewport(viewport) => {
                if self.viewport != viewport {
                    self.viewport = viewport;
                    effects.push(Effect::ViewportResized);
                    let scroll = self.scroll_index.min(self.max_scroll(document));
                    let pan = self.pan_index.min(self.max_pan(document));
                    self.move_view(scroll, pan, &mut effects);
                    let outline_pan = self.outline_pan_index.min(self.max_outline_pan(document));
                    self.outline_pan_index = outline_pan;
                    self.follow_outline_selection();
                }
            }

            Command::GoToStartOfDocument => {
                self.set_page(0, &mut effects);
                self.move_view(0, self.pan_index, &mut effects);
            }

            Command::GoToEndOfDocument => {
                self.set_page(last_page(document), &mut effects);
                let bottom = self.max_scroll(document);
                self.move_view(bottom, self.pan_index, &mut effects);
            }

            Command::GoToStartOfPage => {
                self.move_view(0, self.pan_index, &mut effects);
            }

            Command::GoToEndOfPage => {
                let bottom = self.max_scroll(document);
                self.move_view(bottom, self.pan_index, &mut effects);
            }

            Command::PreviousPage => {
                self.set_page(self.page_index.saturating_sub(1), &mut effects);
            }

            Command::NextPage => {
                let next = (self.page_index + 1).min(last_page(document));
                self.set_page(next, &mut effects);
            }

            Command::ScrollUp => {
                self.move_view(self.scroll_index.saturating_sub(1), self.pan_index, &mut effects);
            }

            Command::ScrollDown => {
                let scroll = (self.scroll_index + 1).min(self.max_scroll(document));
                self.move_view(scroll, self.pan_index, &mut effects);
            }

            Command::PanLeft => {
                self.move_view(self.scroll_index, self.pan_index.saturating_sub(1), &mut effects);
            }

            Command::PanRight => {
                let pan = (self.pan_index + 1).min(self.max_pan(document));
                self.move_view(self.scroll_index, pan, &mut effects);
            }

            Command::GoToPageNumber(input) => {
                match input.trim().parse::<usize>() {
                    Ok(number) if (1..=document.page_count()).contains(&number) => {
                        self.set_page(number - 1, &mut effects);
                    }
                    _ => debug!("Ignoring page number {input:?}"),
                }
            }

            Command::ToggleOutline => {
                self.viewing_outline = !self.viewing_outline;
                effects.push(Effect::ModeChanged {
                    outline: self.viewing_outline,
                });
            }

            Command::OutlinePrevious => {
                self.select_outline(document, self.outline_select_index.saturating_sub(1), &mut effects);
            }

            Command::OutlineNext => {
                self.select_outline(document, self.outline_select_index + 1, &mut effects);
            }

            Command::OutlineHalfPageUp => {
                let step = self.half_page();
                self.select_outline(document, self.outline_select_index.saturating_sub(step), &mut effects);
            }

            Command::OutlineHalfPageDown => {
                let step = self.half_page();
                self.select_outline(document, self.outline_select_index + step, &mut effects);
            }

            Command::OutlinePageUp => {
                let step = self.full_page();
                self.select_outline(document, self.outline_select_index.saturating_sub(step), &mut effects);
            }

            Command::OutlinePageDown => {
                let step = self.full_page();
                self.select_outline(document, self.outline_select_index + step, &mut effects);
            }

            Command::OutlineFirst => {
                self.select_outline(document, 0, &mut effects);
            }

            Command::OutlineLast => {
                self.select_outline(document, usize::MAX, &mut effects);
            }

            Command::OutlinePanLeft => {
                let pan = self.outline_pan_index.saturating_sub(1);
                self.move_outline_pan(pan, &mut effects);
            }

            Command::OutlinePanRight => {
                let pan = (self.outline_pan_index + 1).min(self.max_outline_pan(document));
                self.move_outline_pan(pan, &mut effects);
            }

            Command::ActivateOutline => {
                if self.viewing_outline {
                    self.viewing_outline = false;
                    effects.push(Effect::ModeChanged { outline: false });

                    if let Some(page) = document.outline_page_index_at(self.outline_select_index) {
                        self.set_page(page.min(last_page(document)), &mut effects);
                        self.move_view(0, 0, &mut effects);
                    }
                }
            }

            Command::Search { query, direction } => {
                self.search_results = document.search(&query);
                self.search_direction = direction;
                self.search_result_index = self.nearest_result(direction);
                debug!(
                    "Search {query:?} found {} results",
                    self.search_results.len()
                );
                self.search_query = query;
                effects.push(Effect::SearchUpdated {
                    matches: self.search_results.len(),
                });
            }

            Command::ShowSearchResult => {
                self.reveal_search_result(document, &mut effects);
            }

            Command::NextSearchResult => {
                let count = self.search_results.len();
                if count > 0 {
                    self.search_result_index = (self.search_result_index + 1) % count;
                    effects.push(Effect::SearchResultSelected(self.search_result_index));
                    self.reveal_search_result(document, &mut effects);
                }
            }

            Command::PreviousSearchResult => {
                let count = self.search_results.len();
                if count > 0 {
                    self.search_result_index = match self.search_result_index {
                        0 => count - 1,
                        index => (index - 1).min(count - 1),
                    };
                    effects.push(Effect::SearchResultSelected(self.search_result_index));
                    self.reveal_search_result(document, &mut effects);
                }
            }
        }

        effects
    }

    /// The command `n` maps to for the current search direction
    pub fn advance_command(&self) -> Command {
        match self.search_direction {
            SearchDirection::Forward => Command::NextSearchResult,
            SearchDirection::Backward => Command::PreviousSearchResult,
        }
    }

    /// The command `N` maps to for the current search direction
    pub fn retreat_command(&self) -> Command {
        match self.search_direction {
            SearchDirection::Forward => Command::PreviousSearchResult,
            SearchDirection::Backward => Command::NextSearchResult,
        }
    }

    pub fn search_active(&self) -> bool {
        !self.search_query.is_empty()
    }

    pub fn current_search_result(&self) -> Option<&SearchResultLocation> {
        self.search_results.get(self.search_result_index)
    }

    pub fn max_scroll(&self, document: &Document) -> usize {
        let height = document.page(self.page_index).map_or(0, |p| p.height());
        height.saturating_sub(self.viewport.height)
    }

    pub fn max_pan(&self, document: &Document) -> usize {
        let width = document.page(self.page_index).map_or(0, |p| p.width());
        width.saturating_sub(self.viewport.width)
    }

    pub fn max_outline_pan(&self, document: &Document) -> usize {
        document.outline_width().saturating_sub(self.viewport.width)
    }

    fn half_page(&self) -> usize {
        (self.viewport.height / 2).max(1)
    }

    fn full_page(&self) -> usize {
        self.viewport.height.max(1)
    }

    fn set_page(&mut self, page: usize, effects: &mut Vec<Effect>) {
        if page != self.page_index {
            self.page_index = page;
            self.scroll_index = 0;
            self.pan_index = 0;
            effects.push(Effect::PageChanged(page));
        }
    }

    fn move_view(&mut self, scroll: usize, pan: usize, effects: &mut Vec<Effect>) {
        if scroll != self.scroll_index || pan != self.pan_index {
            self.scroll_index = scroll;
            self.pan_index = pan;
            if !effects.contains(&Effect::ViewMoved) {
                effects.push(Effect::ViewMoved);
            }
        }
    }

    fn move_outline_pan(&mut self, pan: usize, effects: &mut Vec<Effect>) {
        if pan != self.outline_pan_index {
            self.outline_pan_index = pan;
            effects.push(Effect::ViewMoved);
        }
    }

    fn select_outline(&mut self, document: &Document, index: usize, effects: &mut Vec<Effect>) {
        let last = document.outline_height().saturating_sub(1);
        let index = index.min(last);

        if index != self.outline_select_index {
            self.outline_select_index = index;
            effects.push(Effect::OutlineSelected(index));
        }
        self.follow_outline_selection();
    }

    /// Keep the selected outline row inside the viewport
    fn follow_outline_selection(&mut self) {
        let height = self.viewport.height.max(1);
        if self.outline_select_index < self.outline_scroll_index {
            self.outline_scroll_index = self.outline_select_index;
        } else if self.outline_select_index >= self.outline_scroll_index + height {
            self.outline_scroll_index = self.outline_select_index + 1 - height;
        }
    }

    /// Index of the first result at or after the active page (forward), or
    /// the last one at or before it (backward), wrapping when none qualifies
    fn nearest_result(&self, direction: SearchDirection) -> usize {
        let results = &self.search_results;
        let found = match direction {
            SearchDirection::Forward => results.iter().position(|r| r.page_index >= self.page_index),
            SearchDirection::Backward => results.iter().rposition(|r| r.page_index <= self.page_index),
        };

        found.unwrap_or(match direction {
            SearchDirection::Forward => 0,
            SearchDirection::Backward => results.len().saturating_sub(1),
        })
    }

    fn reveal_search_result(&mut self, document: &Document, effects: &mut Vec<Effect>) {
        let Some(result) = self.current_search_result() else {
            return;
        };
        let (page, x, y) = (result.page_index, result.x, result.y);
        let needle_width = self.search_query.unit_len().max(1);

        if self.viewing_outline {
            self.viewing_outline = false;
            effects.push(Effect::ModeChanged { outline: false });
        }
        self.set_page(page.min(last_page(document)), effects);

        let mut scroll = self.scroll_index;
        let height = self.viewport.height.max(1);
        if y < scroll || y >= scroll + height {
            scroll = (y + 1).saturating_sub(height);
        }

        let mut pan = self.pan_index;
        let width = self.viewport.width.max(1);
        if x < pan || x + needle_width > pan + width {
            pan = (x + needle_width).saturating_sub(width).min(x);
        }

        let scroll = scroll.min(self.max_scroll(document));
        let pan = pan.min(self.max_pan(document));
        self.move_view(scroll, pan, effects);
    }
}

fn last_page(document: &Document) -> usize {
    document.page_count().saturating_sub(1)
}
