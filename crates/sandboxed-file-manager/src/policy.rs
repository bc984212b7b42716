//! Retention policy for stored files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Seven days, the default retention window.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Decides when a stored file has outlived its retention window.
///
/// Age is measured from the file's last-modified time. A file is expired
/// only when its age is strictly greater than `max_age`, so a file that is
/// exactly `max_age` old survives one more sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// How long to keep files before they're eligible for removal
    pub max_age: Duration,
    /// Whether the sweep removes anything at all
    pub enabled: bool,
}

impl RetentionPolicy {
    /// Create a policy with the default seven day window.
    pub fn new() -> Self {
        Self {
            max_age: DEFAULT_RETENTION,
            enabled: true,
        }
    }

    /// Set the retention window.
    pub fn remove_after(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Enable or disable removal.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// A policy that never removes anything.
    pub fn disabled() -> Self {
        Self {
            max_age: DEFAULT_RETENTION,
            enabled: false,
        }
    }

    /// Age of a file modified at `modified`, as seen at `now`.
    ///
    /// Modification times in the future count as age zero.
    pub fn age(modified: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(modified)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Whether a file modified at `modified` should be removed at `now`.
    pub fn is_expired(&self, modified: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.enabled && Self::age(modified, now) > self.max_age
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new()
    }
}
