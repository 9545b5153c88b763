use std::collections::HashSet;

use serde::Serialize;

use super::model::Table;

/// What a [`clean`] pass removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanSummary {
    pub table: String,
    /// Missing cells per column before cleaning, in column order.
    pub missing_by_column: Vec<(String, usize)>,
    pub dropped_missing: usize,
    pub dropped_duplicates: usize,
    pub remaining: usize,
}

/// Drop rows holding any missing cell, then collapse exact duplicate rows to
/// their first occurrence.
///
/// The table is modified in place; a second pass removes nothing.
pub fn clean(table: &mut Table) -> CleanSummary {
    let missing_by_column = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let n = table.rows.iter().filter(|r| r.get(idx).is_null()).count();
            (col.clone(), n)
        })
        .collect();

    let before = table.rows.len();
    table.rows.retain(|r| !r.has_missing());
    let dropped_missing = before - table.rows.len();

    let before = table.rows.len();
    let mut seen = HashSet::with_capacity(before);
    let rows = std::mem::take(&mut table.rows);
    table.rows = rows
        .into_iter()
        .filter(|r| seen.insert(r.clone()))
        .collect();
    let dropped_duplicates = before - table.rows.len();

    CleanSummary {
        table: table.name.clone(),
        missing_by_column,
        dropped_missing,
        dropped_duplicates,
        remaining: table.rows.len(),
    }
}
