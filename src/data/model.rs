use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Value – a single cell in a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
/// Rows are deduplicated and grouped by value, so `Value` must be `Ord + Hash`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Value {
    /// Build a float cell; `NaN` is stored as `Null` the way Pandas treats it.
    pub fn from_f64(v: f64) -> Self {
        if v.is_nan() {
            Value::Null
        } else {
            Value::Float(v)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to interpret the value as an `f64` for numeric reductions.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Name of the variant, used in type-mismatch diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Null => "null",
        }
    }

    /// Text view of the cell, with `Null` as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
        }
    }
}

// -- Manual Eq/Ord so rows can live in hash sets and sorted maps --

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
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
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:.4}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::from_f64(v)
    }
}

// ---------------------------------------------------------------------------
// Row – one record of the table
// ---------------------------------------------------------------------------

static NULL: Value = Value::Null;

/// Cells of a single record, aligned with [`Table::columns`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Row {
    pub cells: Vec<Value>,
}

impl Row {
    pub fn new(cells: Vec<Value>) -> Self {
        Self { cells }
    }

    pub fn get(&self, idx: usize) -> &Value {
        self.cells.get(idx).unwrap_or(&NULL)
    }

    pub fn has_missing(&self) -> bool {
        self.cells.iter().any(Value::is_null)
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An ordered sequence of rows under a fixed, ordered header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    /// Label used in diagnostics (usually the source file name).
    #[serde(skip)]
    pub name: String,
    /// Column names in file order.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from literal rows. Handy for fixtures.
    pub fn from_rows(name: impl Into<String>, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows.into_iter().map(Row::new).collect(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `column` in the header.
    pub fn column_index(&self, column: &str) -> Result<usize, PipelineError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| PipelineError::ColumnNotFound {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Iterate the cells of one column in row order.
    pub fn column_values<'a>(
        &'a self,
        column: &str,
    ) -> Result<impl Iterator<Item = &'a Value> + 'a, PipelineError> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(move |r| r.get(idx)))
    }

    /// A table with the same header holding only the selected rows.
    pub fn select(&self, indices: &[usize]) -> Table {
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Replace `column` with `values`, appending it when absent.
    /// `values` must hold one cell per row.
    pub fn set_column(&mut self, column: &str, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.columns.iter().position(|c| c == column) {
            Some(idx) => {
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row.cells[idx] = v;
                }
            }
            None => {
                self.columns.push(column.to_string());
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row.cells.push(v);
                }
            }
        }
    }
}
