//! Group-by and key exclusion.

use super::types::{Table, Value};
use crate::error::Result;
use std::collections::BTreeMap;

/// Owned sub-tables keyed by group value, in key order.
pub type Groups = BTreeMap<Value, Table>;

/// Partition a table by equality of `key`. Rows with an empty key belong to
/// no group. Row order inside each group follows the source table.
pub fn split_by(table: Table, key: &str) -> Result<Groups> {
    let idx = table.column_index(key)?;
    let template = table.with_rows(Vec::new());

    let mut groups = Groups::new();
    for row in table.into_rows() {
        let value = row.cells[idx].clone();
        if value.is_null() {
            continue;
        }
        groups
            .entry(value)
            .or_insert_with(|| template.clone())
            .push_row(row)?;
    }

    Ok(groups)
}

/// Drop every group whose key, rendered as text, is in `block_list`.
pub fn exclude_keys(groups: Groups, block_list: &[String]) -> Groups {
    groups
        .into_iter()
        .filter(|(key, _)| {
            let key = key.to_string();
            !block_list.iter().any(|blocked| *blocked == key)
        })
        .collect()
}
