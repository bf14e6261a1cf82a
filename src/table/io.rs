//! CSV persistence and directory walking.
//!
//! The first CSV column is the row index: it is kept on each [`Row`] as a
//! label and written back first, under its original header.

use super::types::{Row, Table, Value};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Read a CSV file into a [`Table`].
pub fn read_csv(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let csv_err = |e: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();

    let index_name = headers.get(0).unwrap_or("").to_string();
    let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    let mut table = Table::new(columns).with_index_name(index_name);

    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let index = record.get(0).unwrap_or("").to_string();
        let cells = record.iter().skip(1).map(Value::parse).collect();
        table.push_row(Row::new(index, cells))?;
    }

    Ok(table)
}

/// Write a table to CSV. Refuses to replace an existing file unless `force`.
pub fn write_csv(table: &Table, path: &Path, force: bool) -> Result<()> {
    if !force && path.exists() {
        return Err(Error::FileExists(path.to_path_buf()));
    }

    let csv_err = |e: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;

    let header = std::iter::once(table.index_name()).chain(table.columns().iter().map(String::as_str));
    writer.write_record(header).map_err(csv_err)?;

    for row in table.rows() {
        let fields = std::iter::once(row.index.clone()).chain(row.cells.iter().map(Value::to_string));
        writer.write_record(fields).map_err(csv_err)?;
    }

    writer.flush().map_err(|e| Error::io(path, e))
}

/// Ensure `path` is an existing directory.
pub fn require_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(Error::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// All files below `dir`, recursively, in sorted path order.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    require_dir(dir)?;

    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = std::fs::read_dir(&current).map_err(|e| Error::io(&current, e))?;
        for entry in entries {
            let path = entry.map_err(|e| Error::io(&current, e))?.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}
