use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScpError {
    #[error("invalid policy mode {0:?}: must be Allow or Deny")]
    InvalidMode(String),
    #[error("usage report unavailable at {}", path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse usage report: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("usage report contains no reports")]
    EmptyReportSet,
    #[error("expected exactly one usage report, found {0}")]
    UnexpectedReportCount(usize),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("persist policy: {0}")]
    Persistence(String),
}
