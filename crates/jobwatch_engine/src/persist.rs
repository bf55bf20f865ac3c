use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output path has no file name: {0:?}")]
    NoFileName(PathBuf),
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Publishes a file by writing a sibling temp file and renaming it over the
/// target, so readers never observe a half-written snapshot.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    target: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn write(&self, content: &str) -> Result<(), PersistError> {
        if self.target.file_name().is_none() {
            return Err(PersistError::NoFileName(self.target.clone()));
        }
        let dir = match self.target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        ensure_output_dir(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.target).map_err(|e| PersistError::Io(e.error))?;
        Ok(())
    }
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}
