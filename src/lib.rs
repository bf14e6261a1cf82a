//! Valley Sampler - fixed-length, valley-aligned windows from multi-tag
//! sensor recordings.
//!
//! Recordings hold interleaved readings from many tags. Each tag's readings
//! are cut into a window of `2 * win_size` rows centred on the minimum of an
//! alignment signal (typically RSSI), padded at the edges when the valley is
//! close to either end. A second pass re-bases timestamps, computes per-row
//! durations and attaches the average duration profile of all unpadded
//! windows to every window.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Valley Sampler                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │   Table     │──▶│  Windowing  │──▶│  Window CSV │       │
//! │  │ (group-by)  │   │ (valley+pad)│   │ (pad in name)│      │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │                                              │              │
//! │                                              ▼              │
//! │  ┌─────────────┐                     ┌─────────────┐       │
//! │  │  Dispatch   │◀────────────────────│  Duration   │       │
//! │  │ (avg column)│                     │  Aggregator │       │
//! │  └─────────────┘                     └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use valley_sampler::{config::SamplingConfig, core::Sampler, duration};
//!
//! let sampler = Sampler::new(50, SamplingConfig::default())?;
//! sampler.process_all(Path::new("raw"), Path::new("windows"))?;
//!
//! let options = duration::DurationOptions::default();
//! let profile = duration::patch_duration(Path::new("windows"), Path::new("patched"), &options)?;
//! println!("profile has {} positions", profile.len());
//! # Ok::<(), valley_sampler::Error>(())
//! ```

pub mod config;
pub mod core;
pub mod duration;
pub mod error;
pub mod stats;
pub mod table;

// Re-export key types at crate root for convenience
pub use config::{Config, DurationConfig, SamplingConfig};
pub use crate::core::{extract_window, pad, EdgePolicy, PadCounts, Sampler, Window, WindowFileName};
pub use duration::{patch_duration, DurationOptions, DurationProfile};
pub use error::{Error, Result};
pub use stats::{RunStats, SharedRunStats, StatsSnapshot};
pub use table::{Row, Table, Value};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
