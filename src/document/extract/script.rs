//! Subprocess extractor: `python extract.py in.pdf out.json`

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, warn};

use super::Extractor;
use crate::document::loader::{LoadError, read_intermediate};
use crate::document::raw::RawDocument;

pub struct ScriptExtractor {
    python: String,
    script: PathBuf,
}

impl ScriptExtractor {
    pub fn new(python: String, script: PathBuf) -> Self {
        Self { python, script }
    }
}

impl Extractor for ScriptExtractor {
    fn extract(&self, path: &Path) -> Result<RawDocument, LoadError> {
        if !self.script.exists() {
            return Err(LoadError::extractor(
                path,
                format!("extractor script {} does not exist", self.script.display()),
            ));
        }

        let output_file = tempfile::Builder::new()
            .prefix("pdfgrid-")
            .suffix(".json")
            .tempfile()
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            "Running {} {} {} {}",
            self.python,
            self.script.display(),
            path.display(),
            output_file.path().display()
        );

        let output = Command::new(&self.python)
            .arg(&self.script)
            .arg(path)
            .arg(output_file.path())
            .output()
            .map_err(|e| LoadError::extractor(path, format!("cannot run {}: {e}", self.python)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Extractor stderr: {}", stderr.trim());
            return Err(LoadError::extractor(
                path,
                format!("{} ({})", output.status, stderr.trim()),
            ));
        }

        read_intermediate(output_file.path())
    }
}
