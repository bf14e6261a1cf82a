//! Valley-aligned window extraction.
//!
//! A window is `2 * win_size` rows centred on the minimum of the alignment
//! signal. When the valley sits near either end of the sequence the short
//! side is filled by replicating its boundary row, and the number of
//! synthetic rows is recorded per side.

use crate::error::{Error, Result};
use crate::table::{Row, Table};
use serde::{Deserialize, Serialize};

/// Synthetic rows inserted at each end of a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadCounts {
    pub left: usize,
    pub right: usize,
}

impl PadCounts {
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    pub fn total(&self) -> usize {
        self.left + self.right
    }

    /// Only unpadded windows take part in duration averaging.
    pub fn is_unpadded(&self) -> bool {
        self.total() == 0
    }
}

/// What to do when the valley is the first row and there is nothing on the
/// left to replicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgePolicy {
    /// Signal `EmptySequence`.
    #[default]
    Fail,
    /// Fill the whole left half with copies of the valley row.
    ReplicateValley,
}

impl std::str::FromStr for EdgePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fail" => Ok(EdgePolicy::Fail),
            "replicate-valley" => Ok(EdgePolicy::ReplicateValley),
            other => Err(format!("unknown edge policy `{other}`")),
        }
    }
}

/// A fixed-length window cut from one group.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub table: Table,
    pub pad: PadCounts,
}

impl Window {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Rows that came from the source sequence rather than padding.
    pub fn source_rows(&self) -> usize {
        self.len() - self.pad.total()
    }

    pub fn is_unpadded(&self) -> bool {
        self.pad.is_unpadded()
    }
}

/// Extend `items` to `target_len` by repeating the first (`at_front`) or last
/// element. Returns the padded items and the number of copies added.
pub fn pad<T: Clone>(items: Vec<T>, target_len: usize, at_front: bool) -> Result<(Vec<T>, usize)> {
    let count = target_len.saturating_sub(items.len());
    if count == 0 {
        return Ok((items, 0));
    }

    let seed = if at_front { items.first() } else { items.last() };
    let seed = seed.cloned().ok_or(Error::EmptySequence)?;

    let mut padded = Vec::with_capacity(target_len);
    if at_front {
        padded.extend(std::iter::repeat(seed).take(count));
        padded.extend(items);
    } else {
        padded.extend(items);
        padded.extend(std::iter::repeat(seed).take(count));
    }
    Ok((padded, count))
}

/// Index of the minimum value; ties go to the lowest index.
pub fn find_valley(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, min)) if v >= min => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Cut a `2 * win_size` window around the valley of `align_field`.
///
/// The table is expected to be indexed contiguously from zero (see
/// [`Table::reindexed`]); replicated rows keep the label of the row they copy.
pub fn extract_window(
    table: &Table,
    win_size: usize,
    align_field: &str,
    policy: EdgePolicy,
) -> Result<Window> {
    if win_size == 0 {
        return Err(Error::InvalidWindowSize(win_size));
    }

    let signal = table.numeric_column(align_field)?;
    let valley = find_valley(&signal).ok_or(Error::EmptySequence)?;

    let rows = table.rows();
    let lower = valley.saturating_sub(win_size);
    let upper = (valley + win_size).min(rows.len());

    let prev: Vec<Row> = rows[lower..valley].to_vec();
    let post: Vec<Row> = rows[valley..upper].to_vec();

    let (prev, left) = if prev.is_empty() && policy == EdgePolicy::ReplicateValley {
        (vec![rows[valley].clone(); win_size], win_size)
    } else {
        pad(prev, win_size, true)?
    };
    let (post, right) = pad(post, win_size, false)?;

    let mut window_rows = prev;
    window_rows.extend(post);

    Ok(Window {
        table: table.with_rows(window_rows),
        pad: PadCounts::new(left, right),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn signal_table(signal: &[f64]) -> Table {
        Table::from_rows(
            vec!["rssi".into()],
            signal
                .iter()
                .enumerate()
                .map(|(i, v)| Row::new(i.to_string(), vec![Value::Float(*v)]))
                .collect(),
        )
        .unwrap()
    }

    fn labels(window: &Window) -> Vec<&str> {
        window.table.rows().iter().map(|r| r.index.as_str()).collect()
    }

    #[test]
    fn test_pad_front_and_back() {
        let (front, n) = pad(vec![1, 2], 5, true).unwrap();
        assert_eq!(front, vec![1, 1, 1, 1, 2]);
        assert_eq!(n, 3);

        let (back, n) = pad(vec![1, 2], 4, false).unwrap();
        assert_eq!(back, vec![1, 2, 2, 2]);
        assert_eq!(n, 2);

        let (same, n) = pad(vec![1, 2, 3], 2, false).unwrap();
        assert_eq!(same, vec![1, 2, 3]);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_pad_empty_input() {
        let err = pad(Vec::<i32>::new(), 3, true).unwrap_err();
        assert!(matches!(err, Error::EmptySequence));

        let (empty, n) = pad(Vec::<i32>::new(), 0, true).unwrap();
        assert!(empty.is_empty());
        assert_eq!(n, 0);
    }

    #[test]
    fn test_find_valley_first_occurrence() {
        assert_eq!(find_valley(&[5.0, 3.0, 1.0, 4.0, 1.0]), Some(2));
        assert_eq!(find_valley(&[]), None);
    }

    #[test]
    fn test_valley_with_exact_context() {
        let table = signal_table(&[5.0, 3.0, 1.0, 4.0, 9.0]);
        let window = extract_window(&table, 2, "rssi", EdgePolicy::Fail).unwrap();

        assert_eq!(labels(&window), vec!["0", "1", "2", "3"]);
        assert_eq!(window.pad, PadCounts::new(0, 0));
        assert!(window.is_unpadded());
    }

    #[test]
    fn test_valley_near_right_edge() {
        let table = signal_table(&[5.0, 3.0, 2.0, 4.0, 1.0]);
        let window = extract_window(&table, 2, "rssi", EdgePolicy::Fail).unwrap();

        assert_eq!(labels(&window), vec!["2", "3", "4", "4"]);
        assert_eq!(window.pad, PadCounts::new(0, 1));
        assert_eq!(window.source_rows(), 3);
    }

    #[test]
    fn test_valley_near_left_edge() {
        let table = signal_table(&[4.0, 1.0, 3.0, 5.0, 6.0, 7.0]);
        let window = extract_window(&table, 3, "rssi", EdgePolicy::Fail).unwrap();

        assert_eq!(labels(&window), vec!["0", "0", "0", "1", "2", "3"]);
        assert_eq!(window.pad, PadCounts::new(2, 0));
    }

    #[test]
    fn test_valley_at_first_row() {
        let table = signal_table(&[1.0, 3.0, 5.0]);

        let err = extract_window(&table, 2, "rssi", EdgePolicy::Fail).unwrap_err();
        assert!(matches!(err, Error::EmptySequence));

        let window = extract_window(&table, 2, "rssi", EdgePolicy::ReplicateValley).unwrap();
        assert_eq!(labels(&window), vec!["0", "0", "0", "1"]);
        assert_eq!(window.pad, PadCounts::new(2, 0));
    }

    #[test]
    fn test_window_length_invariant() {
        let signal: Vec<f64> = (0..11).map(|i| ((i as f64) - 6.0).abs()).collect();
        let table = signal_table(&signal);

        for win_size in 1..=8 {
            let window = extract_window(&table, win_size, "rssi", EdgePolicy::Fail).unwrap();
            assert_eq!(window.len(), 2 * win_size);
            assert_eq!(window.pad.total() + window.source_rows(), 2 * win_size);
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let table = signal_table(&[2.0, 1.0]);
        assert!(matches!(
            extract_window(&table, 0, "rssi", EdgePolicy::Fail),
            Err(Error::InvalidWindowSize(0))
        ));
        assert!(matches!(
            extract_window(&table, 1, "phase", EdgePolicy::Fail),
            Err(Error::MissingColumn { .. })
        ));
        assert!(matches!(
            extract_window(&signal_table(&[]), 1, "rssi", EdgePolicy::Fail),
            Err(Error::EmptySequence)
        ));
    }

    #[test]
    fn test_edge_policy_parsing() {
        assert_eq!("fail".parse::<EdgePolicy>().unwrap(), EdgePolicy::Fail);
        assert_eq!(
            "Replicate-Valley".parse::<EdgePolicy>().unwrap(),
            EdgePolicy::ReplicateValley
        );
        assert!("clip".parse::<EdgePolicy>().is_err());
    }
}
