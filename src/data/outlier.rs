use serde::Serialize;

use super::model::{Table, Value};
use crate::error::PipelineError;

/// Multiplier applied to the IQR to place the fences.
pub const IQR_FENCE: f64 = 1.5;

/// Quartiles and the derived `[q1 - 1.5·iqr, q3 + 1.5·iqr]` interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fences {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Fences {
    /// Fences over the finite values, or `None` when there are none.
    /// Infinite values never move the quartiles and always fall outside.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        let q1 = percentile(&sorted, 0.25)?;
        let q3 = percentile(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Fences {
            q1,
            q3,
            iqr,
            lower: q1 - IQR_FENCE * iqr,
            upper: q3 + IQR_FENCE * iqr,
        })
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.lower && v <= self.upper
    }
}

/// Percentile of already-sorted data, interpolating linearly between the two
/// nearest order statistics (`pos = p * (n - 1)`).
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Result of [`detect_outliers`]: the fences used and the rows outside them.
#[derive(Debug, Clone, Serialize)]
pub struct OutlierReport {
    pub table: String,
    pub column: String,
    /// `None` when the column holds no finite numeric value.
    pub fences: Option<Fences>,
    pub count: usize,
    #[serde(skip)]
    pub outliers: Table,
}

/// Rows whose `column` lies strictly outside the IQR fences, in table order.
///
/// Missing cells are skipped. Any other non-numeric cell fails the call with
/// [`PipelineError::TypeMismatch`].
pub fn detect_outliers(table: &Table, column: &str) -> Result<OutlierReport, PipelineError> {
    let idx = table.column_index(column)?;

    let mut numeric: Vec<(usize, f64)> = Vec::with_capacity(table.len());
    for (row_no, row) in table.rows.iter().enumerate() {
        match row.get(idx) {
            Value::Null => {}
            v => {
                let x = v.as_f64().ok_or_else(|| PipelineError::TypeMismatch {
                    table: table.name.clone(),
                    column: column.to_string(),
                    row: row_no,
                    found: v.type_name(),
                })?;
                numeric.push((row_no, x));
            }
        }
    }

    let values: Vec<f64> = numeric.iter().map(|&(_, x)| x).collect();
    let fences = Fences::from_values(&values);

    let hits: Vec<usize> = match &fences {
        Some(f) => numeric
            .iter()
            .filter(|&&(_, x)| !f.contains(x))
            .map(|&(i, _)| i)
            .collect(),
        None => Vec::new(),
    };

    Ok(OutlierReport {
        table: table.name.clone(),
        column: column.to_string(),
        fences,
        count: hits.len(),
        outliers: table.select(&hits),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(values: &[i64]) -> Table {
        Table::from_rows(
            "books",
            &["book_title", "ratingsCount"],
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| vec![Value::String(format!("b{i}")), Value::Integer(v)])
                .collect(),
        )
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let data = [1.0, 2.0, 2.0, 3.0, 4.0, 100.0];
        assert_eq!(percentile(&data, 0.25), Some(2.0));
        assert_eq!(percentile(&data, 0.75), Some(3.75));
        assert_eq!(percentile(&data, 0.5), Some(2.5));
        assert_eq!(percentile(&[], 0.5), None);
    }

    #[test]
    fn flags_only_the_extreme_count() {
        let t = counts(&[1, 2, 2, 3, 4, 100]);
        let report = detect_outliers(&t, "ratingsCount").unwrap();

        let fences = report.fences.unwrap();
        assert!(fences.upper < 100.0 && fences.upper > 4.0);
        assert_eq!(report.count, 1);
        assert_eq!(report.outliers.rows[0].get(1), &Value::Integer(100));
    }

    #[test]
    fn constant_column_has_no_outliers() {
        let t = counts(&[5, 5, 5, 5]);
        let report = detect_outliers(&t, "ratingsCount").unwrap();
        assert_eq!(report.fences.unwrap().iqr, 0.0);
        assert!(report.outliers.is_empty());
    }

    #[test]
    fn keeps_source_order_on_both_sides() {
        let t = counts(&[-500, 10, 11, 12, 13, 500, 11]);
        let report = detect_outliers(&t, "ratingsCount").unwrap();
        let got: Vec<_> = report.outliers.rows.iter().map(|r| r.get(1).clone()).collect();
        assert_eq!(got, vec![Value::Integer(-500), Value::Integer(500)]);
    }

    #[test]
    fn infinite_values_are_outliers_not_fences() {
        let t = Table::from_rows(
            "books",
            &["ratingsCount"],
            [f64::INFINITY, 10.0, 11.0, 12.0, f64::INFINITY, 13.0]
                .into_iter()
                .map(|v| vec![Value::Float(v)])
                .collect(),
        );
        let report = detect_outliers(&t, "ratingsCount").unwrap();
        let fences = report.fences.unwrap();
        assert!(fences.iqr.is_finite());
        assert_eq!(report.count, 2);

        let all_inf = Table::from_rows(
            "books",
            &["ratingsCount"],
            vec![vec![Value::Float(f64::INFINITY)]; 3],
        );
        let report = detect_outliers(&all_inf, "ratingsCount").unwrap();
        assert!(report.fences.is_none());
        assert_eq!(report.count, 0);
    }

    #[test]
    fn missing_column_is_reported() {
        let t = counts(&[1, 2]);
        let err = detect_outliers(&t, "rating").unwrap_err();
        assert!(matches!(err, PipelineError::ColumnNotFound { .. }));
    }

    #[test]
    fn text_cells_are_a_type_mismatch() {
        let t = Table::from_rows(
            "reviews",
            &["review/score"],
            vec![vec![Value::Float(4.0)], vec![Value::from("five")]],
        );
        let err = detect_outliers(&t, "review/score").unwrap_err();
        match err {
            PipelineError::TypeMismatch { row, found, .. } => {
                assert_eq!(row, 1);
                assert_eq!(found, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn null_cells_are_skipped() {
        let t = Table::from_rows(
            "reviews",
            &["review/score"],
            vec![vec![Value::Null], vec![Value::Null]],
        );
        let report = detect_outliers(&t, "review/score").unwrap();
        assert!(report.fences.is_none());
        assert_eq!(report.count, 0);
    }
}
