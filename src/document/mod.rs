//! Document model and loading

#[allow(clippy::module_inception)]
mod document;
pub mod extract;
mod loader;
mod outline;
pub mod raw;

pub use document::Document;
pub use loader::{LoadError, LoadOptions, load_document, read_intermediate};
pub use outline::{OUTLINE_INDENT, Outline, OutlineNode, OutlineRow, trim_invisible};
