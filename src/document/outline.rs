//! Bookmark tree stored as an arena of nodes

use crate::charwise::CharwiseExt;

/// Columns added per nesting level when the outline is displayed
pub const OUTLINE_INDENT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineNode {
    title: String,
    page: usize,
    children: Vec<usize>,
}

impl OutlineNode {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Zero-based target page
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Display text, e.g. `Introduction (3)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.title, self.page + 1)
    }
}

/// One row of the flattened outline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutlineRow {
    pub node: usize,
    pub depth: usize,
}

/// A forest of bookmarks. Nodes are addressed by their arena index and
/// every node is reachable from exactly one root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outline {
    nodes: Vec<OutlineNode>,
    roots: Vec<usize>,
}

impl Outline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a top-level bookmark, returning its index
    pub fn add_root(&mut self, title: &str, page: usize) -> usize {
        let index = self.push_node(title, page);
        self.roots.push(index);
        index
    }

    /// Append a bookmark under `parent`. Returns `None` for an unknown parent.
    pub fn add_child(&mut self, parent: usize, title: &str, page: usize) -> Option<usize> {
        if parent >= self.nodes.len() {
            return None;
        }
        let index = self.push_node(title, page);
        self.nodes[parent].children.push(index);
        Some(index)
    }

    fn push_node(&mut self, title: &str, page: usize) -> usize {
        self.nodes.push(OutlineNode {
            title: trim_invisible(title),
            page,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    pub fn node(&self, index: usize) -> Option<&OutlineNode> {
        self.nodes.get(index)
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node in depth-first pre-order, with its nesting depth
    pub fn flatten(&self) -> Vec<OutlineRow> {
        let mut rows = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<OutlineRow> = self
            .roots
            .iter()
            .rev()
            .map(|&node| OutlineRow { node, depth: 0 })
            .collect();

        while let Some(row) = stack.pop() {
            rows.push(row);
            stack.extend(
                self.nodes[row.node]
                    .children
                    .iter()
                    .rev()
                    .map(|&node| OutlineRow {
                        node,
                        depth: row.depth + 1,
                    }),
            );
        }

        rows
    }

    /// Target page of the node shown at flattened row `select_index`
    pub fn page_index_at(&self, select_index: usize) -> Option<usize> {
        self.flatten()
            .get(select_index)
            .map(|row| self.nodes[row.node].page)
    }

    /// Columns needed to display every row with its indentation
    pub fn width(&self) -> usize {
        self.flatten()
            .iter()
            .map(|row| (row.depth + 1) * OUTLINE_INDENT + self.nodes[row.node].label().unit_len())
            .max()
            .unwrap_or(0)
    }

    /// Rows needed to display the whole outline
    pub fn height(&self) -> usize {
        self.nodes.len()
    }

    /// The display text of each flattened row, indentation included
    pub fn lines(&self) -> Vec<String> {
        self.flatten()
            .iter()
            .map(|row| {
                let indent = " ".repeat((row.depth + 1) * OUTLINE_INDENT);
                format!("{indent}{}", self.nodes[row.node].label())
            })
            .collect()
    }
}

/// Whitespace and invisible formatting characters that PDF producers
/// scatter around bookmark titles
fn is_invisible_whitespace(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '\u{00ad}'
                | '\u{034f}'
                | '\u{061c}'
                | '\u{115f}'
                | '\u{1160}'
                | '\u{17b4}'
                | '\u{17b5}'
                | '\u{180e}'
                | '\u{200b}'..='\u{200f}'
                | '\u{2060}'..='\u{2064}'
                | '\u{206a}'..='\u{206f}'
                | '\u{2800}'
                | '\u{3164}'
                | '\u{feff}'
                | '\u{ffa0}'
                | '\u{1d159}'
                | '\u{1d173}'..='\u{1d17a}'
                | '\u{e0020}'
        )
}

pub fn trim_invisible(text: &str) -> String {
    text.trim_matches(is_invisible_whitespace).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_roots() -> Outline {
        let mut outline = Outline::new();
        let first = outline.add_root("Chapter 1", 0);
        outline.add_child(first, "Section 1.1", 2);
        outline.add_root("Chapter 2", 5);
        outline
    }

    #[test]
    fn selection_walks_pre_order() {
        let outline = two_roots();
        assert_eq!(outline.page_index_at(0), Some(0));
        assert_eq!(outline.page_index_at(1), Some(2));
        assert_eq!(outline.page_index_at(2), Some(5));
        assert_eq!(outline.page_index_at(3), None);
    }

    #[test]
    fn deep_nesting_flattens_in_order() {
        let mut outline = Outline::new();
        let a = outline.add_root("a", 0);
        let b = outline.add_child(a, "b", 1).unwrap();
        outline.add_child(b, "c", 2);
        outline.add_child(a, "d", 3);
        let order: Vec<(String, usize)> = outline
            .flatten()
            .iter()
            .map(|row| (outline.node(row.node).unwrap().title().to_string(), row.depth))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a".to_string(), 0),
                ("b".to_string(), 1),
                ("c".to_string(), 2),
                ("d".to_string(), 1)
            ]
        );
    }

    #[test]
    fn footprint_counts_indent_per_level() {
        let outline = two_roots();
        assert_eq!(outline.height(), 3);
        // "Section 1.1 (3)" is 15 wide at depth 1
        assert_eq!(outline.width(), 2 * OUTLINE_INDENT + 15);
        assert_eq!(outline.lines()[1], format!("{}Section 1.1 (3)", " ".repeat(8)));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut outline = Outline::new();
        assert_eq!(outline.add_child(3, "orphan", 0), None);
        assert!(outline.is_empty());
    }

    #[test]
    fn titles_lose_invisible_padding() {
        assert_eq!(trim_invisible("\u{feff}\u{200b} Title\u{00a0}\t"), "Title");
        assert_eq!(trim_invisible("\u{3000}"), "");
        assert_eq!(trim_invisible("in side"), "in side");
    }
}
