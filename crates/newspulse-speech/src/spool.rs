//! Temporary on-disk storage for synthesized audio.
//!
//! Each write goes to a freshly named file so concurrent requests never share
//! a path. Callers read the bytes back and then remove the file.

use std::path::{Path, PathBuf};

use newspulse_core::AppConfig;

use crate::error::SpoolError;

/// Directory that holds short-lived `.mp3` files.
#[derive(Debug, Clone)]
pub struct AudioSpool {
    dir: PathBuf,
}

impl AudioSpool {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.audio_dir.clone())
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `audio` to a new file named `<label>-<uuid>.mp3`, creating the
    /// spool directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SpoolError::Write`] if the directory or file cannot be written.
    pub async fn write(&self, label: &str, audio: &[u8]) -> Result<PathBuf, SpoolError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| SpoolError::Write {
                path: self.dir.clone(),
                source,
            })?;

        let path = self
            .dir
            .join(format!("{label}-{}.mp3", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, audio)
            .await
            .map_err(|source| SpoolError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), bytes = audio.len(), "spooled audio");
        Ok(path)
    }

    /// # Errors
    ///
    /// Returns [`SpoolError::Read`] if the file cannot be read.
    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, SpoolError> {
        tokio::fs::read(path)
            .await
            .map_err(|source| SpoolError::Read {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Delete a spooled file. Failures are logged and otherwise ignored.
    pub async fn remove(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove spooled audio");
        }
    }
}
