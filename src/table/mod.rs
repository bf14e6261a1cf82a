//! Tabular data layer: typed cells, CSV persistence and grouping.

pub mod group;
pub mod io;
pub mod types;

// Re-export commonly used types
pub use group::{exclude_keys, split_by, Groups};
pub use io::{list_files, read_csv, require_dir, write_csv};
pub use types::{Row, Table, Value};
