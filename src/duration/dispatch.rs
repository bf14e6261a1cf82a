//! Broadcast the average duration profile onto every annotated table.

use super::aggregator::DurationProfile;
use super::DurationOptions;
use crate::error::Result;
use crate::table::{list_files, read_csv, write_csv, Table};
use std::path::Path;
use tracing::info;

/// Attach `profile` as `column`, aligned by row position.
pub fn attach_profile(table: Table, profile: &DurationProfile, column: &str) -> Result<Table> {
    table.set_column(column, profile.to_column())
}

/// Rewrite every file below `folder` in place with the profile column.
/// Returns the number of files updated.
pub fn dispatch_avg_duration(
    folder: &Path,
    profile: &DurationProfile,
    options: &DurationOptions,
) -> Result<usize> {
    let mut updated = 0;
    for file in list_files(folder)? {
        let table = read_csv(&file)
            .and_then(|t| attach_profile(t, profile, &options.config.avg_duration_column))
            .map_err(|e| e.in_file(&file))?;
        write_csv(&table, &file, true)?;

        options.stats.record_table_dispatched();
        info!(path = %file.display(), "attached average duration");
        updated += 1;
    }
    Ok(updated)
}
