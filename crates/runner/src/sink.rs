use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use policy_engine::PolicyDocument;
use reporting::render_policy_json;
use scpgen_core::ScpError;

use crate::PolicySink;

pub const DEFAULT_POLICY_FILE: &str = "testSCP.json";

/// Mode of the written policy; the consumer may run as another user.
#[cfg(unix)]
const POLICY_FILE_MODE: u32 = 0o644;

/// Writes the rendered policy to a file, replacing it wholesale.
///
/// The document is written to a temporary file next to the destination and
/// renamed into place, so readers never observe a partially written policy.
#[derive(Debug, Clone)]
pub struct FilePolicySink {
    path: PathBuf,
}

impl FilePolicySink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn target_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Default for FilePolicySink {
    fn default() -> Self {
        Self::new(DEFAULT_POLICY_FILE)
    }
}

impl PolicySink for FilePolicySink {
    fn store(&self, document: &PolicyDocument) -> Result<(), ScpError> {
        let contents = render_policy_json(document)?;
        let dir = self.target_dir();
        if !dir.is_dir() {
            return Err(ScpError::Persistence(format!(
                "output directory {} does not exist",
                dir.display()
            )));
        }

        let mut staged = NamedTempFile::new_in(dir).map_err(|err| {
            ScpError::Persistence(format!("stage policy in {}: {err}", dir.display()))
        })?;
        staged
            .write_all(contents.as_bytes())
            .and_then(|_| set_policy_permissions(staged.as_file()))
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|err| ScpError::Persistence(format!("write policy: {err}")))?;
        staged.persist(&self.path).map_err(|err| {
            ScpError::Persistence(format!("write policy to {}: {}", self.path.display(), err.error))
        })?;

        tracing::info!(
            path = %self.path.display(),
            actions = document.actions().len(),
            "policy written"
        );
        Ok(())
    }
}

#[cfg(unix)]
fn set_policy_permissions(file: &File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(POLICY_FILE_MODE))
}

#[cfg(not(unix))]
fn set_policy_permissions(_file: &File) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use policy_engine::{synthesize, ActionTally};
    use scpgen_core::PolicyMode;

    fn document() -> PolicyDocument {
        let tally: ActionTally = [("GetObject".to_string(), 205), ("PutObject".to_string(), 31)]
            .into_iter()
            .collect();
        synthesize(PolicyMode::Allow, "S3", &tally)
    }

    #[test]
    fn test_store_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testSCP.json");
        FilePolicySink::new(&path).store(&document()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\n  \"Statement\""));
        let parsed: PolicyDocument = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, document());
    }

    #[test]
    fn test_store_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        fs::write(&path, "x".repeat(10_000)).unwrap();

        let empty = synthesize(PolicyMode::Deny, "s3", &ActionTally::default());
        FilePolicySink::new(&path).store(&empty).unwrap();

        let parsed: PolicyDocument = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, empty);
    }

    #[cfg(unix)]
    #[test]
    fn test_written_policy_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testSCP.json");
        FilePolicySink::new(&path).store(&document()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_replacing_restrictive_file_restores_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testSCP.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        FilePolicySink::new(&path).store(&document()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_missing_directory_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scpfalse").join("testSCP.json");
        let err = FilePolicySink::new(&path).store(&document()).unwrap_err();
        assert!(matches!(err, ScpError::Persistence(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_rename_leaves_no_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "").unwrap();

        let err = FilePolicySink::new(&path).store(&document()).unwrap_err();
        assert!(matches!(err, ScpError::Persistence(_)));
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_default_path() {
        assert_eq!(FilePolicySink::default().path(), Path::new("testSCP.json"));
    }
}
