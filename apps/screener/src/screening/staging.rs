//! Staging folder for uploaded resumes.
//!
//! Each upload is written to its own uniquely named temp file inside the
//! folder and lives for one request. Stale files left by a crash are purged at
//! startup.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    /// Creates the folder if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create staging folder {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Removes every regular file in the folder. Returns how many were removed.
    pub fn purge(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read staging folder {}", self.dir.display()))?
        {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!("Could not remove stale upload {}: {e}", path.display()),
            }
        }
        if removed > 0 {
            info!(removed, dir = %self.dir.display(), "Purged stale uploads");
        }
        Ok(removed)
    }

    /// Writes `bytes` to a new file in the folder. The file is deleted when the
    /// handle is closed or dropped.
    pub fn stage(&self, bytes: &[u8]) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(".pdf")
            .tempfile_in(&self.dir)
            .context("Failed to create staged upload")?;
        file.write_all(bytes).context("Failed to write staged upload")?;
        file.flush().context("Failed to flush staged upload")?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_new_creates_missing_folder() {
        let root = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(root.path().join("docs")).unwrap();
        assert!(staging.dir().is_dir());
    }

    #[test]
    fn test_stage_writes_and_close_removes() {
        let root = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(root.path()).unwrap();

        let staged = staging.stage(b"%PDF-1.7 body").unwrap();
        assert_eq!(std::fs::read(staged.path()).unwrap(), b"%PDF-1.7 body");
        assert!(staged.path().starts_with(root.path()));
        assert_eq!(file_count(root.path()), 1);

        staged.close().unwrap();
        assert_eq!(file_count(root.path()), 0);
    }

    #[test]
    fn test_concurrent_uploads_get_distinct_files() {
        let root = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(root.path()).unwrap();
        let a = staging.stage(b"a").unwrap();
        let b = staging.stage(b"b").unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_purge_removes_files_only() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("old.pdf"), b"x").unwrap();
        std::fs::write(root.path().join("older.pdf"), b"y").unwrap();
        std::fs::create_dir(root.path().join("keep")).unwrap();

        let staging = StagingArea::new(root.path()).unwrap();
        assert_eq!(staging.purge().unwrap(), 2);
        assert_eq!(file_count(root.path()), 1);
        assert!(root.path().join("keep").is_dir());
    }
}
