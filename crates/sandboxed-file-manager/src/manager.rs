//! Core sandboxed file manager implementation.

use crate::{
    error::{Result, SandboxedFileError},
    policy::RetentionPolicy,
    security::validate_file_name,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};

/// Outcome of a single retention sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Directory entries looked at
    pub scanned: usize,
    /// Expired files deleted
    pub removed: usize,
    /// Regular files younger than the retention window
    pub retained: usize,
    /// Entries that are not regular files
    pub skipped: usize,
    /// Entries whose metadata could not be read or that could not be deleted
    pub failed: usize,
}

/// Flat storage directory shared by uploads and composed images.
///
/// Every file lives directly under the base directory and is addressed by a
/// single-component name. Writes never replace an existing file.
#[derive(Clone, Debug)]
pub struct SandboxedManager {
    base_dir: PathBuf,
    retention_policy: RetentionPolicy,
}

impl SandboxedManager {
    /// Create a new builder for configuring the manager.
    #[must_use]
    pub fn builder() -> SandboxedManagerBuilder {
        SandboxedManagerBuilder::new()
    }

    /// The storage directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The policy applied by [`SandboxedManager::sweep_expired`].
    pub fn retention_policy(&self) -> RetentionPolicy {
        self.retention_policy
    }

    /// Write `contents` to a new file called `name`.
    ///
    /// The file is created exclusively, flushed and synced before this
    /// returns, and its full path is handed back.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The name is not a plain single component
    /// - A file with that name already exists
    /// - The underlying write fails
    pub async fn write_new<C: AsRef<[u8]>>(&self, name: &str, contents: C) -> Result<PathBuf> {
        let file_path = self.validate_and_get_path(name)?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => SandboxedFileError::AlreadyExists {
                    name: name.to_string(),
                },
                _ => SandboxedFileError::Io(e),
            })?;

        file.write_all(contents.as_ref()).await?;
        file.flush().await?;
        file.sync_all().await?;

        tracing::debug!("Stored {} ({} bytes)", name, contents.as_ref().len());

        Ok(file_path)
    }

    /// Read the whole file called `name`.
    ///
    /// # Errors
    /// Returns [`SandboxedFileError::FileNotFound`] when the file is absent
    /// and an I/O error for anything else.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let file_path = self.validate_and_get_path(name)?;
        fs::read(&file_path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SandboxedFileError::FileNotFound {
                name: name.to_string(),
            },
            _ => SandboxedFileError::Io(e),
        })
    }

    /// Delete every file whose last-modified time is older than the
    /// retention window, measured against the current time.
    ///
    /// # Errors
    /// See [`SandboxedManager::sweep_expired_at`].
    pub async fn sweep_expired(&self) -> Result<SweepReport> {
        self.sweep_expired_at(Utc::now()).await
    }

    /// Delete every file that is expired at `now`.
    ///
    /// Listing the directory is the only fatal step. A failure to stat or
    /// delete an individual entry is logged, counted in
    /// [`SweepReport::failed`], and the sweep moves on.
    ///
    /// # Errors
    /// Returns [`SandboxedFileError::SweepFailed`] if the directory cannot
    /// be listed.
    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        if !self.retention_policy.enabled {
            tracing::trace!("Sweep skipped: retention disabled");
            return Ok(SweepReport::default());
        }

        let entries = self.list_entries().await?;
        Ok(self.sweep_entries(entries, now).await)
    }

    async fn list_entries(&self) -> Result<Vec<PathBuf>> {
        let listing_failed = |e: std::io::Error| SandboxedFileError::SweepFailed {
            reason: format!("cannot list {}: {e}", self.base_dir.display()),
        };

        let mut entries = fs::read_dir(&self.base_dir).await.map_err(listing_failed)?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(listing_failed)? {
            paths.push(entry.path());
        }
        Ok(paths)
    }

    async fn sweep_entries(&self, paths: Vec<PathBuf>, now: DateTime<Utc>) -> SweepReport {
        let mut report = SweepReport::default();

        for path in paths {
            report.scanned += 1;

            let metadata = match fs::symlink_metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!("Failed to read metadata for {:?}: {}", path, e);
                    report.failed += 1;
                    continue;
                }
            };

            if !metadata.is_file() {
                report.skipped += 1;
                continue;
            }

            let modified: DateTime<Utc> = match metadata.modified() {
                Ok(modified) => DateTime::from(modified),
                Err(e) => {
                    tracing::warn!("No modification time for {:?}: {}", path, e);
                    report.failed += 1;
                    continue;
                }
            };

            if !self.retention_policy.is_expired(modified, now) {
                report.retained += 1;
                continue;
            }

            match fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::info!(
                        age_secs = RetentionPolicy::age(modified, now).as_secs(),
                        "Deleted old file: {:?}",
                        path.file_name().unwrap_or_default()
                    );
                    report.removed += 1;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!("File vanished before removal: {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to remove expired file {:?}: {}", path, e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    fn validate_and_get_path(&self, name: &str) -> Result<PathBuf> {
        validate_file_name(name)?;
        Ok(self.base_dir.join(name))
    }
}

/// Builder for configuring a `SandboxedManager`.
pub struct SandboxedManagerBuilder {
    base_directory: Option<PathBuf>,
    retention_policy: RetentionPolicy,
}

impl SandboxedManagerBuilder {
    fn new() -> Self {
        Self {
            base_directory: None,
            retention_policy: RetentionPolicy::default(),
        }
    }

    /// Set the base directory for file storage.
    #[must_use]
    pub fn base_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.base_directory = Some(path.into());
        self
    }

    /// Set the retention policy.
    #[must_use]
    pub fn retention_policy(mut self, policy: RetentionPolicy) -> Self {
        self.retention_policy = policy;
        self
    }

    /// Build the `SandboxedManager`, creating the base directory if needed.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Base directory is not set
    /// - Base directory cannot be created
    pub async fn build(self) -> Result<SandboxedManager> {
        let base_dir = self
            .base_directory
            .ok_or_else(|| SandboxedFileError::Configuration {
                message: "Base directory is required".to_string(),
            })?;

        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| SandboxedFileError::DirectoryCreation {
                path: base_dir.clone(),
                source: e,
            })?;

        let manager = SandboxedManager {
            base_dir,
            retention_policy: self.retention_policy,
        };

        tracing::info!(
            "SandboxedManager initialized - base_dir: {:?}, retention: {:?}, enabled: {}",
            manager.base_dir,
            manager.retention_policy.max_age,
            manager.retention_policy.enabled
        );

        Ok(manager)
    }
}
