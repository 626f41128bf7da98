use std::fs;
use std::path::{Path, PathBuf};

use scpgen_core::ScpError;

use crate::ReportSource;

/// Reads the scanner report from disk.
#[derive(Debug, Clone)]
pub struct FileReportSource {
    path: PathBuf,
}

impl FileReportSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSource for FileReportSource {
    fn load(&self) -> Result<Vec<u8>, ScpError> {
        let bytes = fs::read(&self.path).map_err(|source| ScpError::InputUnavailable {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "loaded usage report");
        Ok(bytes)
    }
}
