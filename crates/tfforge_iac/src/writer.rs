//! Document persistence.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{IacError, IacResult};
use crate::render::GeneratedDocument;

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "main.tf";

/// Writes generated documents to a single fixed path.
///
/// Each write truncates the file and writes the whole document. Writes
/// through the same writer are serialized; the last one to finish wins.
#[derive(Debug)]
pub struct DocumentWriter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl Default for DocumentWriter {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_PATH)
    }
}

impl DocumentWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the document, replacing any existing file. Returns the number of
    /// bytes written.
    pub fn write(&self, document: &GeneratedDocument) -> IacResult<usize> {
        let _guard = self.lock.lock();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        let mut file = File::create(&self.path).map_err(|e| self.write_error(e))?;
        file.write_all(document.as_str().as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| self.write_error(e))?;

        debug!("Wrote {} bytes to {:?}", document.len(), self.path);
        Ok(document.len())
    }

    fn write_error(&self, source: std::io::Error) -> IacError {
        IacError::Write {
            path: self.path.clone(),
            source,
        }
    }
}
