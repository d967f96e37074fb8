// # Config File Store
//
// Reads the configuration file and replaces it with a run's output. The
// contents are bytes throughout; the file need not be valid UTF-8.
//
// ## Atomic Replace
//
// - The new text is written to `<file>.tmp` next to the original and flushed
// - The original's permissions are copied onto the temporary file
// - Optionally, the original is copied to `<file>.backup`
// - The temporary file is renamed over the original
//
// A failure at any step leaves the original untouched and removes the
// temporary file.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::{Error, Result};

/// A configuration file on disk
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    keep_backup: bool,
}

impl ConfigFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            keep_backup: false,
        }
    }

    /// Keep a copy of the previous contents in `<file>.backup`
    pub fn with_backup(mut self, keep_backup: bool) -> Self {
        self.keep_backup = keep_backup;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file
    pub async fn load(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).await.map_err(|e| {
            Error::config_file(format!("Failed to read {}: {}", self.path.display(), e))
        })
    }

    /// Replace the file with `contents`
    pub async fn store(&self, contents: &[u8]) -> Result<()> {
        let temp_path = self.temp_path();

        if let Err(e) = self.write_temp(&temp_path, contents).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if self.keep_backup {
            let backup_path = self.backup_path();
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("Failed to create backup {}: {}", backup_path.display(), e);
            }
        }

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(Error::config_file(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            )));
        }

        tracing::debug!("Replaced {}", self.path.display());
        Ok(())
    }

    async fn write_temp(&self, temp_path: &Path, contents: &[u8]) -> Result<()> {
        let mut file = fs::File::create(temp_path).await.map_err(|e| {
            Error::config_file(format!(
                "Failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.write_all(contents).await.map_err(|e| {
            Error::config_file(format!(
                "Failed to write to temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            Error::config_file(format!(
                "Failed to flush temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        // The configuration holds an API key; keep whatever mode it had
        if let Ok(metadata) = fs::metadata(&self.path).await {
            fs::set_permissions(temp_path, metadata.permissions())
                .await
                .map_err(|e| {
                    Error::config_file(format!(
                        "Failed to set permissions on {}: {}",
                        temp_path.display(),
                        e
                    ))
                })?;
        }

        Ok(())
    }

    /// Path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        Self::with_suffix(&self.path, "tmp")
    }

    /// Path to backup file
    pub fn backup_path(&self) -> PathBuf {
        Self::with_suffix(&self.path, "backup")
    }

    /// `cfddns.conf` -> `cfddns.conf.<suffix>`
    fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
        let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".");
        name.push(suffix);
        path.with_file_name(name)
    }
}
