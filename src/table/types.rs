//! Typed cells, rows and tables read from sensor recordings.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;

/// A single cell, typed by inference when the CSV is read.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Infer the type of a raw CSV field.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Integer(i);
        }
        if looks_like_float(raw) {
            if let Ok(f) = raw.parse::<f64>() {
                return Value::Float(f);
            }
        }
        match raw {
            "True" | "true" => Value::Bool(true),
            "False" | "false" => Value::Bool(false),
            _ => Value::String(raw.to_string()),
        }
    }

    /// Numeric view of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }
}

/// Floats as written by CSV tools carry a decimal point or a signed
/// exponent. Anything else that failed integer parsing (long digit runs,
/// hex tag ids such as `3000E200`) stays text.
fn looks_like_float(raw: &str) -> bool {
    raw.contains('.')
        || ["e-", "e+", "E-", "E+"].iter().any(|exp| raw.contains(exp))
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        fn rank(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

/// Renders the cell the way it is written back to CSV.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) if v.is_nan() => Ok(()),
            // Debug keeps the trailing `.0` on whole floats; exponents get a sign
            Value::Float(v) => {
                let repr = format!("{v:?}");
                match repr.split_once('e') {
                    Some((mantissa, exp)) if !exp.starts_with('-') => {
                        write!(f, "{mantissa}e+{exp}")
                    }
                    _ => write!(f, "{repr}"),
                }
            }
            Value::String(s) => write!(f, "{s}"),
        }
    }
}

/// One row: the index label from the first CSV column plus the data cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub index: String,
    pub cells: Vec<Value>,
}

impl Row {
    pub fn new(index: impl Into<String>, cells: Vec<Value>) -> Self {
        Self {
            index: index.into(),
            cells,
        }
    }
}

/// An ordered sequence of rows sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    index_name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given data columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            index_name: String::new(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table, checking every row against the schema width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = name.into();
        self
    }

    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.cells.len() != self.columns.len() {
            return Err(Error::LengthMismatch {
                expected: self.columns.len(),
                actual: row.cells.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, or `MissingColumn`.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Cells of one column in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| &r.cells[idx]).collect())
    }

    /// A column as floats. Empty or textual cells are rejected.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, r)| {
                r.cells[idx].as_f64().ok_or_else(|| Error::NonNumericValue {
                    column: name.to_string(),
                    row,
                    value: r.cells[idx].to_string(),
                })
            })
            .collect()
    }

    /// Replace the named column, or append it when absent.
    pub fn set_column(mut self, name: &str, values: Vec<Value>) -> Result<Self> {
        if values.len() != self.rows.len() {
            return Err(Error::LengthMismatch {
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        match self.columns.iter().position(|c| c == name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.cells[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.cells.push(value);
                }
            }
        }
        Ok(self)
    }

    /// Relabel rows 0..N-1, dropping the labels read from disk.
    pub fn reindexed(mut self) -> Self {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.index = i.to_string();
        }
        self
    }

    /// A new table with this schema and the given rows.
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            index_name: self.index_name.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }
}
