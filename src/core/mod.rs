//! Core windowing for the valley sampler.
//!
//! This module contains:
//! - Valley detection, window extraction and edge padding
//! - The output naming scheme that carries pad counts
//! - The sampling pass that ties grouping, windowing and persistence together

pub mod naming;
pub mod sampling;
pub mod windowing;

// Re-export commonly used types
pub use naming::{is_unpadded, key_suffix, parse_pad_counts, WindowFileName};
pub use sampling::{GroupWindow, Sampler};
pub use windowing::{extract_window, find_valley, pad, EdgePolicy, PadCounts, Window};
