//! Opening files as documents

use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info};

use crate::settings::{self, ExtractorKind};

use super::document::Document;
use super::extract::{Extractor, ScriptExtractor};
use super::raw::RawDocument;

/// Errors that keep a document from opening.
///
/// A failed load never leaves a partial document behind.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported file type: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("extractor failed on {}: {detail}", path.display())]
    ExtractorFailed { path: PathBuf, detail: String },

    #[error("malformed extractor output for {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn extractor(path: &Path, detail: impl Into<String>) -> Self {
        Self::ExtractorFailed {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }
}

/// How PDFs get extracted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    pub extractor: ExtractorKind,
    pub python: String,
    pub script: Option<PathBuf>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            extractor: ExtractorKind::Auto,
            python: "python3".to_string(),
            script: None,
        }
    }
}

impl LoadOptions {
    /// Options as currently configured
    pub fn from_settings() -> Self {
        let settings = settings::get_settings();
        Self {
            extractor: settings.extractor,
            python: settings.python,
            script: settings.extractor_script,
        }
    }
}

/// Open `path` and generate every page grid.
///
/// `.pdf` goes through an extractor, `.json` is read as already-extracted
/// intermediate output.
pub fn load_document(path: &Path, options: &LoadOptions) -> Result<Document, LoadError> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);

    let raw = match extension.as_deref() {
        Some("pdf") => extractor_for(options, path)?.extract(path)?,
        Some("json") => read_intermediate(path)?,
        _ => {
            return Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };

    let mut document = raw.into_document(path.display().to_string());

    let started = Instant::now();
    document.generate_grids();
    info!(
        "Loaded {} ({} pages, grids in {:?})",
        path.display(),
        document.page_count(),
        started.elapsed()
    );

    Ok(document)
}

/// Parse extractor JSON from a file
pub fn read_intermediate(path: &Path) -> Result<RawDocument, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn extractor_for(options: &LoadOptions, path: &Path) -> Result<Box<dyn Extractor>, LoadError> {
    match options.extractor {
        #[cfg(feature = "pdf")]
        ExtractorKind::Auto | ExtractorKind::Native => {
            debug!("Using native extractor");
            Ok(Box::new(super::extract::NativeExtractor))
        }
        #[cfg(not(feature = "pdf"))]
        ExtractorKind::Native => Err(LoadError::extractor(
            path,
            "built without native PDF support (enable the `pdf` feature)",
        )),
        #[cfg(not(feature = "pdf"))]
        ExtractorKind::Auto => script_extractor(options, path),
        ExtractorKind::Script => script_extractor(options, path),
    }
}

fn script_extractor(options: &LoadOptions, path: &Path) -> Result<Box<dyn Extractor>, LoadError> {
    let script = options
        .script
        .clone()
        .or_else(find_script)
        .ok_or_else(|| LoadError::extractor(path, "extractor script not found"))?;

    debug!("Using extractor script {}", script.display());
    Ok(Box::new(ScriptExtractor::new(options.python.clone(), script)))
}

fn find_script() -> Option<PathBuf> {
    let local = PathBuf::from("tools").join("extract.py");
    if local.exists() {
        return Some(local);
    }
    settings::installed_script_path().filter(|path| path.exists())
}
