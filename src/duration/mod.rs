//! Duration pass over a directory of windows.
//!
//! This module contains:
//! - Per-row duration computation and timestamp re-basing
//! - The running accumulator that averages unpadded windows
//! - Dispatch of the resulting profile to every window

pub mod aggregator;
pub mod dispatch;

// Re-export commonly used types
pub use aggregator::{annotate_durations, compute_avg_duration, DurationAccumulator, DurationProfile};
pub use dispatch::{attach_profile, dispatch_avg_duration};

use crate::config::DurationConfig;
use crate::error::Result;
use crate::stats::{create_shared_stats, SharedRunStats};
use std::path::Path;

/// Settings shared by both stages of the duration pass.
#[derive(Debug, Clone)]
pub struct DurationOptions {
    pub config: DurationConfig,
    /// Whether annotated copies may replace existing files
    pub overwrite: bool,
    pub stats: SharedRunStats,
}

impl DurationOptions {
    pub fn new(config: DurationConfig) -> Self {
        Self {
            config,
            overwrite: true,
            stats: create_shared_stats(),
        }
    }
}

impl Default for DurationOptions {
    fn default() -> Self {
        Self::new(DurationConfig::default())
    }
}

/// Annotate `src_folder` into `out_folder`, average the unpadded windows and
/// attach the profile to every annotated file.
pub fn patch_duration(
    src_folder: &Path,
    out_folder: &Path,
    options: &DurationOptions,
) -> Result<DurationProfile> {
    let profile = compute_avg_duration(src_folder, out_folder, options)?;
    dispatch_avg_duration(out_folder, &profile, options)?;
    Ok(profile)
}
