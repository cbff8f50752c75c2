//! Intermediate representation produced by extractors
//!
//! This is the JSON schema written by `tools/extract.py` and accepted
//! directly for `.json` inputs.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::grid::{Block, Page};

use super::document::Document;
use super::outline::Outline;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub pages: Vec<RawPage>,
    #[serde(default)]
    pub outline: Vec<RawOutline>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawPage {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawBlock {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub text: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawOutline {
    pub title: String,
    /// Zero-based; extractors report unresolvable targets as negative
    pub page: i64,
    #[serde(default)]
    pub outline: Vec<RawOutline>,
}

impl RawDocument {
    /// Build the document model. Grids are not generated yet.
    pub fn into_document(self, name: impl Into<String>) -> Document {
        let mut document = Document::new(name);

        for raw_page in self.pages {
            let mut page = Page::new(raw_page.width, raw_page.height);
            for b in raw_page.blocks {
                page.add(Block::new(b.left, b.right, b.top, b.bottom, b.text));
            }
            document.add(page);
        }

        let mut outline = Outline::new();
        for root in &self.outline {
            let index = outline.add_root(&root.title, target_page(root));
            add_children(&mut outline, index, &root.outline);
        }
        document.set_outline(outline);

        document
    }
}

fn add_children(outline: &mut Outline, parent: usize, children: &[RawOutline]) {
    for child in children {
        if let Some(index) = outline.add_child(parent, &child.title, target_page(child)) {
            add_children(outline, index, &child.outline);
        }
    }
}

fn target_page(raw: &RawOutline) -> usize {
    usize::try_from(raw.page).unwrap_or_else(|_| {
        debug!("Outline entry {:?} has no page target, using page 1", raw.title);
        0
    })
}
