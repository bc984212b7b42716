//! # Sandboxed File Manager
//!
//! A flat, sandboxed storage directory with age-based retention.
//!
//! Files are addressed by single-component names and always land directly
//! in the base directory. Writes are exclusive (`create_new`), so a stored
//! file is never silently replaced. A retention sweep deletes every regular
//! file whose last-modified time is older than the configured window.
//!
//! ## Basic Usage
//!
//! ```rust
//! use sandboxed_file_manager::{RetentionPolicy, SandboxedManager};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = SandboxedManager::builder()
//!     .base_directory("./uploads")
//!     .retention_policy(
//!         RetentionPolicy::new().remove_after(Duration::from_secs(7 * 24 * 60 * 60)),
//!     )
//!     .build()
//!     .await?;
//!
//! let path = manager.write_new("4f6c.png", b"...").await?;
//! let bytes = manager.read("4f6c.png").await?;
//!
//! let report = manager.sweep_expired().await?;
//! println!("removed {} of {} files", report.removed, report.scanned);
//! # Ok(())
//! # }
//! ```
//!
//! ## Security
//!
//! - Names containing separators, `.`/`..`, NUL bytes or absolute paths are
//!   rejected before touching the filesystem
//! - Extensions taken from client file names are reduced to short ASCII
//!   alphanumerics (see [`file_types`])

pub mod error;
pub mod file_types;
pub mod manager;
pub mod policy;
pub mod security;

pub use error::{Result, SandboxedFileError};
pub use manager::{SandboxedManager, SandboxedManagerBuilder, SweepReport};
pub use policy::{DEFAULT_RETENTION, RetentionPolicy};
