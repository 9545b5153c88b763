use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::{Table, Value};
use crate::error::PipelineError;

/// Default length of a ranking.
pub const DEFAULT_TOP_N: usize = 10;

/// How the metric of a [`RankedAggregate`] was reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Count,
    Mean,
}

/// Ranking direction. Rankings are "top" lists, so descending is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// One `(key, metric)` pair of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub key: Value,
    pub value: f64,
}

/// Ordered, size-limited list of group keys and their metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAggregate {
    pub key_column: String,
    /// Column reduced by a mean; `None` for counts.
    pub value_column: Option<String>,
    pub metric: MetricKind,
    pub entries: Vec<RankedEntry>,
}

impl RankedAggregate {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(key, metric)` pairs with keys rendered as text.
    pub fn pairs(&self) -> Vec<(String, f64)> {
        self.entries
            .iter()
            .map(|e| (e.key.to_text(), e.value))
            .collect()
    }

    /// Render a metric the way this ranking reports it.
    pub fn format_value(&self, v: f64) -> String {
        match self.metric {
            MetricKind::Count => format!("{v:.0}"),
            MetricKind::Mean => format!("{v:.3}"),
        }
    }
}

impl fmt::Display for RankedAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, e) in self.entries.iter().enumerate() {
            writeln!(
                f,
                "{:>3}. {}  {}",
                rank + 1,
                e.key.to_text(),
                self.format_value(e.value)
            )?;
        }
        Ok(())
    }
}

/// Group accumulator preserving first-seen key order.
struct Groups {
    order: Vec<Value>,
    slots: HashMap<Value, (f64, usize)>,
}

impl Groups {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Register `key` so it keeps its first-seen position even if it never
    /// receives a value.
    fn slot(&mut self, key: &Value) -> &mut (f64, usize) {
        if !self.slots.contains_key(key) {
            self.order.push(key.clone());
        }
        self.slots.entry(key.clone()).or_insert((0.0, 0))
    }

    fn into_entries(mut self, reduce: impl Fn(f64, usize) -> f64) -> Vec<RankedEntry> {
        self.order
            .into_iter()
            .filter_map(|key| {
                let (sum, n) = self.slots.remove(&key)?;
                (n > 0).then(|| RankedEntry {
                    value: reduce(sum, n),
                    key,
                })
            })
            .collect()
    }
}

fn rank(mut entries: Vec<RankedEntry>, order: SortOrder, n: usize) -> Vec<RankedEntry> {
    // `sort_by` is stable, so equal metrics keep first-seen order.
    match order {
        SortOrder::Descending => entries.sort_by(|a, b| b.value.total_cmp(&a.value)),
        SortOrder::Ascending => entries.sort_by(|a, b| a.value.total_cmp(&b.value)),
    }
    entries.truncate(n);
    entries
}

/// Occurrences of each distinct non-missing value of `key_column`, top `n`
/// by count.
pub fn top_by_count(
    table: &Table,
    key_column: &str,
    n: usize,
) -> Result<RankedAggregate, PipelineError> {
    let mut groups = Groups::new();
    for key in table.column_values(key_column)? {
        if key.is_null() {
            continue;
        }
        let slot = groups.slot(key);
        slot.0 += 1.0;
        slot.1 += 1;
    }

    Ok(RankedAggregate {
        key_column: key_column.to_string(),
        value_column: None,
        metric: MetricKind::Count,
        entries: rank(groups.into_entries(|sum, _| sum), SortOrder::Descending, n),
    })
}

/// Mean of `value_column` per `key_column` group, top `n` descending.
pub fn top_by_mean(
    table: &Table,
    key_column: &str,
    value_column: &str,
    n: usize,
) -> Result<RankedAggregate, PipelineError> {
    mean_by(table, key_column, value_column, SortOrder::Descending, n)
}

/// Mean of `value_column` per `key_column` group, ranked in `order`.
///
/// Missing keys and missing values are ignored; a group whose values are all
/// missing does not appear. Non-numeric values fail with
/// [`PipelineError::TypeMismatch`].
pub fn mean_by(
    table: &Table,
    key_column: &str,
    value_column: &str,
    order: SortOrder,
    n: usize,
) -> Result<RankedAggregate, PipelineError> {
    let key_idx = table.column_index(key_column)?;
    let value_idx = table.column_index(value_column)?;

    let mut groups = Groups::new();
    for (row_no, row) in table.rows.iter().enumerate() {
        let key = row.get(key_idx);
        if key.is_null() {
            continue;
        }
        let slot = groups.slot(key);
        let value = row.get(value_idx);
        if value.is_null() {
            continue;
        }
        let x = value.as_f64().ok_or_else(|| PipelineError::TypeMismatch {
            table: table.name.clone(),
            column: value_column.to_string(),
            row: row_no,
            found: value.type_name(),
        })?;
        slot.0 += x;
        slot.1 += 1;
    }

    Ok(RankedAggregate {
        key_column: key_column.to_string(),
        value_column: Some(value_column.to_string()),
        metric: MetricKind::Mean,
        entries: rank(groups.into_entries(|sum, n| sum / n as f64), order, n),
    })
}

/// Row count and non-missing count of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub rows: usize,
    pub non_null: usize,
}

pub fn total_counts(table: &Table, column: &str) -> Result<Totals, PipelineError> {
    let non_null = table.column_values(column)?.filter(|v| !v.is_null()).count();
    Ok(Totals {
        rows: table.len(),
        non_null,
    })
}
