use chrono::Utc;
use cron::Schedule;
use sandboxed_file_manager::{SandboxedManager, SweepReport};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::RetentionConfig;
use crate::errors::{AppError, AppResult};
use crate::utils::cron_helper;

/// Background task deleting expired files from the uploads directory
pub struct RetentionSweeper {
    storage: SandboxedManager,
    schedule: Schedule,
    run_on_startup: bool,
}

impl RetentionSweeper {
    /// Create a new RetentionSweeper from configuration
    pub fn from_config(storage: SandboxedManager, config: &RetentionConfig) -> AppResult<Self> {
        let schedule =
            cron_helper::parse_schedule(&config.schedule).map_err(AppError::configuration)?;
        Ok(Self {
            storage,
            schedule,
            run_on_startup: config.run_on_startup,
        })
    }

    /// Run a single sweep, logging its outcome.
    ///
    /// Returns `None` when the directory could not be listed.
    pub async fn run_once(&self) -> Option<SweepReport> {
        match self.storage.sweep_expired().await {
            Ok(report) => {
                info!(
                    scanned = report.scanned,
                    removed = report.removed,
                    retained = report.retained,
                    skipped = report.skipped,
                    failed = report.failed,
                    "Retention sweep completed"
                );
                Some(report)
            }
            Err(e) => {
                error!("Retention sweep failed: {}", e);
                None
            }
        }
    }

    /// Sweep at every scheduled time, forever
    pub async fn start(self) {
        info!(
            "Starting retention sweeper for {:?} (max age {})",
            self.storage.base_dir(),
            humantime::format_duration(self.storage.retention_policy().max_age)
        );

        if self.run_on_startup {
            self.run_once().await;
        }

        loop {
            let now = Utc::now();
            let Some(next_run) = cron_helper::next_after(&self.schedule, now) else {
                warn!("Retention schedule has no future runs, sweeper stopping");
                return;
            };

            let wait = (next_run - now).to_std().unwrap_or(Duration::ZERO);
            info!("Next retention sweep at {}", next_run);
            tokio::time::sleep(wait).await;

            self.run_once().await;
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{FileTime, set_file_mtime};
    use sandboxed_file_manager::RetentionPolicy;
    use std::time::SystemTime;
    use tempfile::TempDir;

    const DAY: u64 = 24 * 60 * 60;

    async fn storage(dir: &TempDir) -> SandboxedManager {
        SandboxedManager::builder()
            .base_directory(dir.path())
            .retention_policy(RetentionPolicy::new().remove_after(Duration::from_secs(7 * DAY)))
            .build()
            .await
            .unwrap()
    }

    fn backdate(path: &std::path::Path, days: u64) {
        let mtime = SystemTime::now() - Duration::from_secs(days * DAY);
        set_file_mtime(path, FileTime::from_system_time(mtime)).unwrap();
    }

    #[tokio::test]
    async fn test_run_once_removes_only_expired_files() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        let old = storage.write_new("old.png", b"old").await.unwrap();
        let recent = storage.write_new("recent.png", b"recent").await.unwrap();
        backdate(&old, 8);
        backdate(&recent, 6);

        let sweeper = RetentionSweeper::from_config(storage, &RetentionConfig::default()).unwrap();
        let report = sweeper.run_once().await.unwrap();

        assert_eq!(report.removed, 1);
        assert_eq!(report.retained, 1);
        assert!(!old.exists());
        assert!(recent.exists());
    }

    #[tokio::test]
    async fn test_run_once_survives_missing_directory() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        let sweeper = RetentionSweeper::from_config(storage, &RetentionConfig::default()).unwrap();
        drop(dir);

        assert!(sweeper.run_once().await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_schedule_is_rejected() {
        let dir = TempDir::new().unwrap();
        let config = RetentionConfig {
            schedule: "daily".to_string(),
            ..RetentionConfig::default()
        };

        let result = RetentionSweeper::from_config(storage(&dir).await, &config);
        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }
}
