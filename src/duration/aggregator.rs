//! Per-row durations and the cross-file average profile.

use super::DurationOptions;
use crate::config::DurationConfig;
use crate::core::naming::is_unpadded;
use crate::error::{Error, Result};
use crate::table::{list_files, read_csv, require_dir, write_csv, Table, Value};
use std::path::Path;
use tracing::{debug, info};

/// Average inter-sample gap per window position.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationProfile(Vec<f64>);

impl DurationProfile {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The profile as a table column.
    pub fn to_column(&self) -> Vec<Value> {
        self.0.iter().map(|v| Value::Float(*v)).collect()
    }
}

/// Running element-wise sum and count over equally long duration columns.
#[derive(Debug, Default)]
pub struct DurationAccumulator {
    sums: Vec<f64>,
    count: usize,
}

impl DurationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the durations of one unpadded table read from `path`.
    pub fn add(&mut self, path: &Path, durations: &[f64]) -> Result<()> {
        if self.count == 0 {
            self.sums = durations.to_vec();
        } else if durations.len() != self.sums.len() {
            return Err(Error::InconsistentWindowLength {
                path: path.to_path_buf(),
                expected: self.sums.len(),
                actual: durations.len(),
            });
        } else {
            for (sum, d) in self.sums.iter_mut().zip(durations) {
                *sum += d;
            }
        }
        self.count += 1;
        Ok(())
    }

    /// Number of tables accumulated so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Element-wise mean of everything added.
    pub fn finish(self) -> Result<DurationProfile> {
        if self.count == 0 {
            return Err(Error::NoUnpaddedWindows);
        }
        let n = self.count as f64;
        Ok(DurationProfile(self.sums.into_iter().map(|s| s / n).collect()))
    }
}

/// Add the duration column and make timestamps relative to the first row.
///
/// `duration[0]` is zero and `duration[i] = t[i] - t[i-1]`. Integer
/// timestamps stay integers. Returns the new table and its durations.
pub fn annotate_durations(table: Table, config: &DurationConfig) -> Result<(Table, Vec<f64>)> {
    let stamps = table.numeric_column(&config.timestamp_key)?;
    let cells = table.column(&config.timestamp_key)?;

    let durations: Vec<f64> = std::iter::once(0.0)
        .chain((1..cells.len()).map(|i| {
            integer_gap(cells[i], cells[i - 1])
                .map(|d| d as f64)
                .unwrap_or(stamps[i] - stamps[i - 1])
        }))
        .take(cells.len())
        .collect();

    let relative: Vec<Value> = cells
        .iter()
        .zip(&stamps)
        .map(|(cell, t)| match integer_gap(cell, cells[0]) {
            Some(d) => Value::Integer(d),
            None => Value::Float(t - stamps[0]),
        })
        .collect();

    let duration_column = durations.iter().map(|d| Value::Float(*d)).collect();
    let table = table
        .set_column(&config.timestamp_key, relative)?
        .set_column(&config.duration_column, duration_column)?;

    Ok((table, durations))
}

/// Exact difference of two integer cells, `None` for anything else or on overflow.
fn integer_gap(later: &Value, earlier: &Value) -> Option<i64> {
    match (later, earlier) {
        (Value::Integer(a), Value::Integer(b)) => a.checked_sub(*b),
        _ => None,
    }
}

/// Annotate every file below `src_folder` into `out_folder` and average the
/// durations of the unpadded ones.
///
/// All files are written before the profile is returned, so callers can
/// dispatch it safely afterwards.
pub fn compute_avg_duration(
    src_folder: &Path,
    out_folder: &Path,
    options: &DurationOptions,
) -> Result<DurationProfile> {
    require_dir(out_folder)?;

    let mut accumulator = DurationAccumulator::new();
    for file in list_files(src_folder)? {
        let durations = annotate_file(&file, out_folder, options).map_err(|e| e.in_file(&file))?;

        if is_unpadded(&file) {
            accumulator.add(&file, &durations)?;
            options.stats.record_profile_contributor();
            debug!(file = %file.display(), "added to duration profile");
        }
    }

    let contributors = accumulator.count();
    let profile = accumulator.finish()?;
    info!(contributors, length = profile.len(), "computed average duration");
    Ok(profile)
}

fn annotate_file(file: &Path, out_folder: &Path, options: &DurationOptions) -> Result<Vec<f64>> {
    let table = read_csv(file)?;
    let (table, durations) = annotate_durations(table, &options.config)?;

    let name = file
        .file_name()
        .ok_or_else(|| Error::FileNotFound(file.to_path_buf()))?;
    let out_path = out_folder.join(name);
    write_csv(&table, &out_path, options.overwrite)?;

    options.stats.record_table_annotated();
    info!(path = %out_path.display(), "wrote durations");
    Ok(durations)
}
