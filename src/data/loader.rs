use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Row, Table, Value};
use crate::error::PipelineError;

/// Cell texts read as missing, following the Pandas `read_csv` defaults.
const NA_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>",
    "#N/A", "#NA", "#N/A N/A", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` (and anything unrecognised) – comma-delimited with a header row
/// * `.tsv` – tab-delimited with a header row
/// * `.json` – `[{ "col": value, ... }, ...]`
/// * `.parquet` / `.pq` – flat scalar columns
///
/// Rows are returned as read: nothing is dropped or deduplicated here.
pub fn load(path: &Path) -> Result<Table, PipelineError> {
    if !path.is_file() {
        return Err(PipelineError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        "tsv" => load_delimited(path, b'\t')?,
        _ => load_delimited(path, b',')?,
    };
    promote_mixed_numeric(&mut table);
    Ok(table)
}

fn open(path: &Path) -> Result<File, PipelineError> {
    File::open(path).map_err(|_| PipelineError::NotFound {
        path: path.to_path_buf(),
    })
}

fn table_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// Delimited loader
// ---------------------------------------------------------------------------

/// Header row with column names, then one record per line.  Every record
/// must have as many fields as the header.
///
/// Types are inferred per column: a column is numeric (or boolean) only when
/// every non-missing cell parses as such, otherwise its cells stay text.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Table, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(open(path)?);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| PipelineError::parse(path, format!("reading header: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    check_unique_headers(path, &headers)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        records.push(result.map_err(|e| PipelineError::parse(path, format!("row {row_no}: {e}")))?);
    }

    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|idx| ColumnKind::infer(records.iter().filter_map(|r| r.get(idx))))
        .collect();

    let mut table = Table::new(table_name(path), headers);
    table.rows = records
        .iter()
        .map(|record| {
            Row::new(
                record
                    .iter()
                    .zip(&kinds)
                    .map(|(cell, kind)| kind.parse(cell))
                    .collect(),
            )
        })
        .collect();

    Ok(table)
}

fn check_unique_headers(path: &Path, headers: &[String]) -> Result<(), PipelineError> {
    let mut seen = HashSet::new();
    for h in headers {
        if !seen.insert(h.as_str()) {
            return Err(PipelineError::parse(path, format!("duplicate column '{h}'")));
        }
    }
    Ok(())
}

fn is_missing(s: &str) -> bool {
    NA_MARKERS.contains(&s)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Storage type of a delimited column, decided from all of its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
}

impl ColumnKind {
    fn infer<'a>(cells: impl Iterator<Item = &'a str>) -> Self {
        let mut seen = false;
        let mut all_int = true;
        let mut all_float = true;
        let mut all_bool = true;
        for s in cells.filter(|s| !is_missing(s)) {
            seen = true;
            all_int &= s.parse::<i64>().is_ok();
            all_float &= s.parse::<f64>().is_ok();
            all_bool &= parse_bool(s).is_some();
            if !(all_int || all_float || all_bool) {
                return ColumnKind::Text;
            }
        }
        match (seen, all_int, all_float, all_bool) {
            (false, ..) => ColumnKind::Text,
            (_, true, _, _) => ColumnKind::Integer,
            (_, _, true, _) => ColumnKind::Float,
            (_, _, _, true) => ColumnKind::Bool,
            _ => ColumnKind::Text,
        }
    }

    /// Convert one raw cell. Parsing cannot fail here since the kind was
    /// inferred from the same cells; a mismatch falls back to text.
    fn parse(self, s: &str) -> Value {
        if is_missing(s) {
            return Value::Null;
        }
        let parsed = match self {
            ColumnKind::Integer => s.parse::<i64>().ok().map(Value::Integer),
            ColumnKind::Float => s.parse::<f64>().ok().map(Value::from_f64),
            ColumnKind::Bool => parse_bool(s).map(Value::Bool),
            ColumnKind::Text => None,
        };
        parsed.unwrap_or_else(|| Value::String(s.to_string()))
    }
}

/// A JSON or Parquet column mixing integers and floats is a float column, so
/// `4` and `4.0` compare equal when deduplicating.
fn promote_mixed_numeric(table: &mut Table) {
    for idx in 0..table.columns.len() {
        let mut has_int = false;
        let mut has_float = false;
        for row in &table.rows {
            match row.get(idx) {
                Value::Integer(_) => has_int = true,
                Value::Float(_) => has_float = true,
                _ => {}
            }
        }
        if has_int && has_float {
            for row in &mut table.rows {
                if let Value::Integer(i) = row.cells[idx] {
                    row.cells[idx] = Value::Float(i as f64);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "book_title": "Dune", "rating": 4.5 },
///   ...
/// ]
/// ```
///
/// Columns are the union of keys in first-seen order.
fn load_json(path: &Path) -> Result<Table, PipelineError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::parse(path, format!("reading JSON: {e}")))?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| PipelineError::parse(path, e))?;

    let records = root
        .as_array()
        .ok_or_else(|| PipelineError::parse(path, "expected top-level JSON array"))?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| PipelineError::parse(path, format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    let mut table = Table::new(table_name(path), columns);
    for rec in records {
        // Every record was checked to be an object above.
        let Some(obj) = rec.as_object() else { continue };
        let cells = table
            .columns
            .iter()
            .map(|c| obj.get(c).map(json_to_value).unwrap_or(Value::Null))
            .collect();
        table.rows.push(Row::new(cells));
    }

    Ok(table)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::from_f64(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of scalar columns (strings, ints, floats, bools).
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table, PipelineError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)
        .map_err(|e| PipelineError::parse(path, format!("reading parquet metadata: {e}")))?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    check_unique_headers(path, &columns)?;

    let reader = builder
        .build()
        .map_err(|e| PipelineError::parse(path, format!("building parquet reader: {e}")))?;

    let mut table = Table::new(table_name(path), columns);

    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| PipelineError::parse(path, format!("reading record batch: {e}")))?;

        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_value(col, row))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| PipelineError::parse(path, format!("row {row}: {e}")))?;
            table.rows.push(Row::new(cells));
        }
    }

    Ok(table)
}

// -- Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Value, String> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    fn downcast<'a, T: 'static>(col: &'a Arc<dyn Array>) -> Result<&'a T, String> {
        col.as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| format!("unexpected array layout for {:?}", col.data_type()))
    }

    let value = match col.data_type() {
        DataType::Utf8 => Value::String(downcast::<StringArray>(col)?.value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Value::Integer(downcast::<Int32Array>(col)?.value(row) as i64),
        DataType::Int64 => Value::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => Value::from_f64(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Float64 => Value::from_f64(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => Value::Bool(downcast::<BooleanArray>(col)?.value(row)),
        other => return Err(format!("unsupported column type {other:?}")),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_keeps_header_order_and_all_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "books.csv",
            "book_title,rating,ratingsCount\nDune,4.5,10\nEmma,,3\nDune,4.5,10\n",
        );
        let t = load(&path).unwrap();
        assert_eq!(t.columns, vec!["book_title", "rating", "ratingsCount"]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.name, "books.csv");
        assert_eq!(t.rows[0].get(1), &Value::Float(4.5));
        assert_eq!(t.rows[0].get(2), &Value::Integer(10));
        assert!(t.rows[1].get(1).is_null());
    }

    #[test]
    fn na_markers_load_as_null() {
        for marker in ["NA", "NaN", "null", "None", "n/a"] {
            assert!(ColumnKind::Float.parse(marker).is_null(), "{marker}");
            assert!(ColumnKind::Text.parse(marker).is_null(), "{marker}");
        }
        assert_eq!(ColumnKind::infer(["True", "false", "NA"].into_iter()), ColumnKind::Bool);
        assert_eq!(ColumnKind::infer(["Nancy", "NaN"].into_iter()), ColumnKind::Text);
        assert_eq!(ColumnKind::infer(["", "NA"].into_iter()), ColumnKind::Text);
    }

    #[test]
    fn numeric_looking_text_keeps_its_spelling() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "books.csv",
            "book_title,User_id,ratingsCount\nInfinity,0123,7\n007,123,8\n1e3,u9,\nDune,u1,10\n",
        );
        let t = load(&path).unwrap();
        let titles: Vec<_> = t.column_values("book_title").unwrap().cloned().collect();
        assert_eq!(
            titles,
            vec![
                Value::from("Infinity"),
                Value::from("007"),
                Value::from("1e3"),
                Value::from("Dune"),
            ]
        );
        assert_ne!(t.rows[0].get(1), t.rows[1].get(1));
        assert_eq!(t.rows[0].get(1), &Value::from("0123"));
        assert_eq!(t.rows[1].get(2), &Value::Integer(8));
        assert!(t.rows[2].get(2).is_null());
    }

    #[test]
    fn mixed_int_float_column_is_promoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "r.csv", "score\n4\n4.5\n");
        let t = load(&path).unwrap();
        assert_eq!(t.rows[0].get(0), &Value::Float(4.0));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::NotFound { .. }));
    }

    #[test]
    fn directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::NotFound { .. }));
    }

    #[test]
    fn ragged_rows_are_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.csv", "a,b\n1,2\n3\n");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Parse { .. }), "{err}");
    }

    #[test]
    fn invalid_utf8_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.csv");
        std::fs::write(&path, b"title\ncaf\xe9\n").unwrap();
        assert!(matches!(load(&path), Err(PipelineError::Parse { .. })));
    }

    #[test]
    fn duplicate_header_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "dup.csv", "a,a\n1,2\n");
        assert!(matches!(load(&path), Err(PipelineError::Parse { .. })));
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "r.tsv", "book_title\treview/text\nDune\tGreat, really\n");
        let t = load(&path).unwrap();
        assert_eq!(t.rows[0].get(1), &Value::from("Great, really"));
    }

    #[test]
    fn json_records_fill_absent_keys_with_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "r.json",
            r#"[{"book_title": "Dune", "score": 5}, {"score": 2.5, "book_title": "Emma", "extra": true}]"#,
        );
        let t = load(&path).unwrap();
        assert_eq!(t.columns, vec!["book_title", "score", "extra"]);
        assert!(t.rows[0].get(2).is_null());
        assert_eq!(t.rows[0].get(1), &Value::Float(5.0));
    }

    #[test]
    fn parquet_maps_arrow_types_and_nulls() {
        use arrow::array::ArrayRef;
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("book_title", DataType::Utf8, false),
            Field::new("review/score", DataType::Float64, true),
            Field::new("helpful", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Dune", "Emma"])) as ArrayRef,
                Arc::new(Float64Array::from(vec![Some(4.5), None])) as ArrayRef,
                Arc::new(Int64Array::from(vec![3, 0])) as ArrayRef,
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.parquet");
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let t = load(&path).unwrap();
        assert_eq!(t.columns, vec!["book_title", "review/score", "helpful"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[0].get(0), &Value::from("Dune"));
        assert_eq!(t.rows[0].get(1), &Value::Float(4.5));
        assert!(t.rows[1].get(1).is_null());
        assert_eq!(t.rows[1].get(2), &Value::Integer(0));
    }

    #[test]
    fn truncated_parquet_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "broken.parquet", "PAR1 not really");
        assert!(matches!(load(&path), Err(PipelineError::Parse { .. })));
    }

    #[test]
    fn json_non_array_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "r.json", r#"{"book_title": "Dune"}"#);
        assert!(matches!(load(&path), Err(PipelineError::Parse { .. })));
    }
}
