pub mod charwise;
pub mod document;
pub mod event_source;
pub mod grid;
pub mod location;
pub mod main_app;
pub mod panic_handler;
pub mod settings;
pub mod view;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use document::{Document, LoadError, LoadOptions, load_document};
pub use main_app::{App, run_app_with_event_source};
