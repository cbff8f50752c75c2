//! PDF extractors
//!
//! An extractor turns a file into the intermediate representation: per-page
//! sizes, positioned text blocks and the outline forest.

use std::path::Path;

use super::loader::LoadError;
use super::raw::RawDocument;

#[cfg(feature = "pdf")]
mod native;
mod script;

#[cfg(feature = "pdf")]
pub use native::NativeExtractor;
pub use script::ScriptExtractor;

pub trait Extractor {
    fn extract(&self, path: &Path) -> Result<RawDocument, LoadError>;
}
