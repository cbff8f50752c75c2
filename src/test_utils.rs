pub mod test_helpers {
    use std::path::{Path, PathBuf};

    use crate::document::raw::{RawBlock, RawDocument, RawOutline, RawPage};
    use crate::event_source::{Event, KeyCode, SimulatedEventSource};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    /// Builder for scripted key sequences
    #[derive(Default)]
    pub struct TestScenarioBuilder {
        events: Vec<Event>,
    }

    impl TestScenarioBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn press_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::char_key(c));
            self
        }

        pub fn press_ctrl_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::ctrl_char_key(c));
            self
        }

        pub fn press(mut self, code: KeyCode) -> Self {
            self.events.push(SimulatedEventSource::key(code));
            self
        }

        pub fn press_enter(self) -> Self {
            self.press(KeyCode::Enter)
        }

        pub fn press_escape(self) -> Self {
            self.press(KeyCode::Esc)
        }

        pub fn press_tab(self) -> Self {
            self.press(KeyCode::Tab)
        }

        /// Type each character of `text`
        pub fn type_text(mut self, text: &str) -> Self {
            for c in text.chars() {
                self = self.press_char(c);
            }
            self
        }

        /// `/text` followed by Enter
        pub fn search(self, text: &str) -> Self {
            self.press_char('/').type_text(text).press_enter()
        }

        /// `:page` followed by Enter
        pub fn go_to_page(self, page: usize) -> Self {
            self.press_char(':').type_text(&page.to_string()).press_enter()
        }

        pub fn scroll_down(mut self, times: usize) -> Self {
            for _ in 0..times {
                self = self.press_char('j');
            }
            self
        }

        pub fn pan_right(mut self, times: usize) -> Self {
            for _ in 0..times {
                self = self.press_char('l');
            }
            self
        }

        pub fn next_page(self) -> Self {
            self.press_char(' ')
        }

        pub fn toggle_outline(self) -> Self {
            self.press_char('o')
        }

        pub fn resize(mut self, width: u16, height: u16) -> Self {
            self.events.push(SimulatedEventSource::resize(width, height));
            self
        }

        pub fn quit(self) -> Self {
            self.press_char('q')
        }

        pub fn build(self) -> SimulatedEventSource {
            SimulatedEventSource::new(self.events)
        }
    }

    pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).expect("test backend never fails")
    }

    /// The terminal buffer as text, one line per row, trailing blanks removed
    pub fn capture_terminal_state(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut lines = Vec::new();

        for y in 0..buffer.area.height {
            let mut line = String::new();
            for x in 0..buffer.area.width {
                if let Some(cell) = buffer.cell((x, y)) {
                    line.push_str(cell.symbol());
                }
            }
            lines.push(line.trim_end().to_string());
        }

        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }

        lines.join("\n")
    }

    /// One page of blocks given as `(left, right, top, bottom, text)`
    pub fn raw_page(blocks: &[(f64, f64, f64, f64, &str)]) -> RawPage {
        RawPage {
            width: 612.0,
            height: 792.0,
            blocks: blocks
                .iter()
                .map(|&(left, right, top, bottom, text)| RawBlock {
                    left,
                    top,
                    right,
                    bottom,
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    pub fn raw_outline(title: &str, page: i64, children: Vec<RawOutline>) -> RawOutline {
        RawOutline {
            title: title.to_string(),
            page,
            outline: children,
        }
    }

    /// Write an intermediate document as `name` under `dir`
    pub fn write_intermediate(dir: &Path, name: &str, raw: &RawDocument) -> PathBuf {
        let path = dir.join(name);
        let json = serde_json::to_string_pretty(raw).expect("intermediate document serializes");
        std::fs::write(&path, json).expect("fixture is writable");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;

    #[test]
    fn scenario_builder_collects_events() {
        let scenario = TestScenarioBuilder::new()
            .search("cat")
            .scroll_down(2)
            .go_to_page(12)
            .quit()
            .build();

        // "/cat" + Enter, two scrolls, ":12" + Enter, q
        assert_eq!(scenario.events.len(), 5 + 2 + 4 + 1);
    }

    #[test]
    fn blank_terminal_captures_nothing() {
        let terminal = create_test_terminal(10, 3);
        assert_eq!(capture_terminal_state(&terminal), "");
    }
}
