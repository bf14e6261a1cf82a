//! Counters describing what a batch run read, wrote and averaged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Statistics for the current run.
#[derive(Debug)]
pub struct RunStats {
    /// Input tables read by the sampling pass
    files_read: AtomicU64,
    /// Groups that were windowed
    groups_sampled: AtomicU64,
    /// Groups dropped by the block-list
    groups_excluded: AtomicU64,
    /// Window files written
    windows_written: AtomicU64,
    /// Written windows that carry padding
    windows_padded: AtomicU64,
    /// Tables given duration and relative timestamps
    tables_annotated: AtomicU64,
    /// Unpadded tables averaged into the profile
    profile_contributors: AtomicU64,
    /// Tables that received the profile column
    tables_dispatched: AtomicU64,
    /// Run start time
    run_start: DateTime<Utc>,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            files_read: AtomicU64::new(0),
            groups_sampled: AtomicU64::new(0),
            groups_excluded: AtomicU64::new(0),
            windows_written: AtomicU64::new(0),
            windows_padded: AtomicU64::new(0),
            tables_annotated: AtomicU64::new(0),
            profile_contributors: AtomicU64::new(0),
            tables_dispatched: AtomicU64::new(0),
            run_start: Utc::now(),
        }
    }

    pub fn record_file_read(&self) {
        self.files_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_group_sampled(&self) {
        self.groups_sampled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_groups_excluded(&self, count: u64) {
        self.groups_excluded.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a written window file.
    pub fn record_window_written(&self, padded: bool) {
        self.windows_written.fetch_add(1, Ordering::Relaxed);
        if padded {
            self.windows_padded.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_table_annotated(&self) {
        self.tables_annotated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_profile_contributor(&self) {
        self.profile_contributors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_table_dispatched(&self) {
        self.tables_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            files_read: self.files_read.load(Ordering::Relaxed),
            groups_sampled: self.groups_sampled.load(Ordering::Relaxed),
            groups_excluded: self.groups_excluded.load(Ordering::Relaxed),
            windows_written: self.windows_written.load(Ordering::Relaxed),
            windows_padded: self.windows_padded.load(Ordering::Relaxed),
            tables_annotated: self.tables_annotated.load(Ordering::Relaxed),
            profile_contributors: self.profile_contributors.load(Ordering::Relaxed),
            tables_dispatched: self.tables_dispatched.load(Ordering::Relaxed),
            run_start: self.run_start,
            run_duration_ms: (Utc::now() - self.run_start).num_milliseconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        self.snapshot().summary()
    }

    /// Persist the current statistics as JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.snapshot()).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub files_read: u64,
    pub groups_sampled: u64,
    pub groups_excluded: u64,
    pub windows_written: u64,
    pub windows_padded: u64,
    pub tables_annotated: u64,
    pub profile_contributors: u64,
    pub tables_dispatched: u64,
    pub run_start: DateTime<Utc>,
    pub run_duration_ms: u64,
}

impl StatsSnapshot {
    /// Load a snapshot persisted by [`RunStats::save`].
    pub fn load(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(std::io::Error::other)
    }

    pub fn summary(&self) -> String {
        format!(
            "Run Statistics:\n\
             - Files read: {}\n\
             - Groups sampled: {}\n\
             - Groups excluded: {}\n\
             - Windows written: {} ({} padded)\n\
             - Tables annotated: {}\n\
             - Profile contributors: {}\n\
             - Tables dispatched: {}\n\
             - Started: {}\n\
             - Duration: {} ms",
            self.files_read,
            self.groups_sampled,
            self.groups_excluded,
            self.windows_written,
            self.windows_padded,
            self.tables_annotated,
            self.profile_contributors,
            self.tables_dispatched,
            self.run_start.format("%Y-%m-%d %H:%M:%S UTC"),
            self.run_duration_ms
        )
    }
}

/// Thread-safe shared statistics.
pub type SharedRunStats = Arc<RunStats>;

pub fn create_shared_stats() -> SharedRunStats {
    Arc::new(RunStats::new())
}

/// Default location of the persisted statistics under `data_path`.
pub fn stats_file(data_path: &Path) -> PathBuf {
    data_path.join("last_run.json")
}
