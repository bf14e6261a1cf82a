//! Sampling pass: group, filter, window and persist.
//!
//! Every input file is split by the filter key, block-listed groups are
//! dropped, and each remaining group yields exactly one window file whose
//! name encodes its pad counts (see [`crate::core::naming`]).

use crate::config::SamplingConfig;
use crate::core::naming::WindowFileName;
use crate::core::windowing::{extract_window, Window};
use crate::error::{Error, Result};
use crate::stats::{create_shared_stats, SharedRunStats};
use crate::table::{exclude_keys, list_files, read_csv, require_dir, split_by, write_csv, Table, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The window cut from one retained group.
#[derive(Debug, Clone)]
pub struct GroupWindow {
    pub key: Value,
    pub window: Window,
}

/// Runs the sampling pass with a fixed window size and configuration.
pub struct Sampler {
    win_size: usize,
    config: SamplingConfig,
    overwrite: bool,
    stats: SharedRunStats,
}

impl Sampler {
    /// Create a sampler cutting windows of `2 * win_size` rows.
    pub fn new(win_size: usize, config: SamplingConfig) -> Result<Self> {
        if win_size == 0 {
            return Err(Error::InvalidWindowSize(win_size));
        }
        Ok(Self {
            win_size,
            config,
            overwrite: true,
            stats: create_shared_stats(),
        })
    }

    /// Whether existing output files may be replaced.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_stats(mut self, stats: SharedRunStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn win_size(&self) -> usize {
        self.win_size
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    pub fn stats(&self) -> &SharedRunStats {
        &self.stats
    }

    /// Group `table`, drop block-listed keys and window every remaining group.
    pub fn sample_table(&self, table: Table) -> Result<Vec<GroupWindow>> {
        let groups = split_by(table, &self.config.filter_key)?;
        let total = groups.len();
        let groups = exclude_keys(groups, &self.config.block_list);
        self.stats
            .record_groups_excluded((total - groups.len()) as u64);

        let mut windows = Vec::with_capacity(groups.len());
        for (key, group) in groups {
            let group = group.reindexed();
            let window = extract_window(
                &group,
                self.win_size,
                &self.config.align_key,
                self.config.edge_policy,
            )?;
            debug!(
                key = %key,
                rows = group.len(),
                pad_left = window.pad.left,
                pad_right = window.pad.right,
                "windowed group"
            );
            self.stats.record_group_sampled();
            windows.push(GroupWindow { key, window });
        }
        Ok(windows)
    }

    /// Window one CSV file into `out_folder`. Returns the written paths.
    pub fn process_one(&self, csv_file: &Path, out_folder: &Path) -> Result<Vec<PathBuf>> {
        require_dir(out_folder)?;
        info!(file = %csv_file.display(), "processing file");

        let table = read_csv(csv_file).map_err(|e| e.in_file(csv_file))?;
        self.stats.record_file_read();

        let windows = self.sample_table(table).map_err(|e| e.in_file(csv_file))?;

        let mut written = Vec::with_capacity(windows.len());
        for GroupWindow { key, window } in windows {
            let name = WindowFileName::new(
                csv_file,
                self.win_size,
                &key.to_string(),
                self.config.group_key_len,
                window.pad,
            );
            let out_path = out_folder.join(name.to_string());
            write_csv(&window.table, &out_path, self.overwrite)?;
            self.stats.record_window_written(!window.is_unpadded());
            info!(path = %out_path.display(), "wrote window");
            written.push(out_path);
        }
        Ok(written)
    }

    /// Window every file below `src_folder`, recursively.
    pub fn process_all(&self, src_folder: &Path, out_folder: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for file in list_files(src_folder)? {
            written.extend(self.process_one(&file, out_folder)?);
        }
        Ok(written)
    }
}
