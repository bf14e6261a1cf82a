//! Run statistics for sampling and duration passes.

pub mod run;

// Re-export commonly used types
pub use run::{create_shared_stats, stats_file, RunStats, SharedRunStats, StatsSnapshot};
