//! In-process extraction through MuPDF

use std::path::Path;

use mupdf::text_page::TextBlockType;
use mupdf::{Document, TextPageFlags};

use super::Extractor;
use crate::document::loader::LoadError;
use crate::document::raw::{RawBlock, RawDocument, RawOutline, RawPage};

pub struct NativeExtractor;

impl Extractor for NativeExtractor {
    fn extract(&self, path: &Path) -> Result<RawDocument, LoadError> {
        let fail = |e: mupdf::error::Error| LoadError::extractor(path, e.to_string());

        let doc = Document::open(path.to_string_lossy().as_ref()).map_err(fail)?;

        let outline = doc
            .outlines()
            .map(|outlines| convert_outlines(&outlines))
            .unwrap_or_default();

        let page_count = doc.page_count().map_err(fail)?;
        let mut pages = Vec::new();

        for page_index in 0..page_count {
            let page = doc.load_page(page_index).map_err(fail)?;
            let bounds = page.bounds().map_err(fail)?;
            let text_page = page.to_text_page(TextPageFlags::empty()).map_err(fail)?;

            let blocks = text_page
                .blocks()
                .filter(|block| block.r#type() == TextBlockType::Text)
                .map(|block| {
                    let bbox = block.bounds();
                    let mut text = String::new();
                    for line in block.lines() {
                        text.extend(line.chars().filter_map(|ch| ch.char()));
                        text.push('\n');
                    }
                    RawBlock {
                        left: f64::from(bbox.x0),
                        top: f64::from(bbox.y0),
                        right: f64::from(bbox.x1),
                        bottom: f64::from(bbox.y1),
                        text,
                    }
                })
                .collect();

            pages.push(RawPage {
                width: f64::from(bounds.x1 - bounds.x0),
                height: f64::from(bounds.y1 - bounds.y0),
                blocks,
            });
        }

        Ok(RawDocument { pages, outline })
    }
}

fn convert_outlines(outlines: &[mupdf::Outline]) -> Vec<RawOutline> {
    outlines
        .iter()
        .map(|outline| RawOutline {
            title: outline.title.clone(),
            page: outline
                .dest
                .as_ref()
                .map_or(-1, |dest| i64::from(dest.loc.page_number)),
            outline: convert_outlines(&outline.down),
        })
        .collect()
}
