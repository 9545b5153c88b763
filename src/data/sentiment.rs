use serde::{Deserialize, Serialize};

use super::aggregate::{mean_by, RankedAggregate, SortOrder};
use super::model::{Table, Value};
use super::text::normalize;
use crate::error::{PipelineError, ScoringError};

/// Column written by [`score_all`].
pub const SENTIMENT_COLUMN: &str = "sentiment";

/// Default number of histogram bins over `[-1, 1]`.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

// ---------------------------------------------------------------------------
// Polarity capability
// ---------------------------------------------------------------------------

/// Maps text to a polarity in roughly `[-1, 1]` (0 is neutral).
pub trait PolarityScorer {
    fn polarity(&self, text: &str) -> Result<f64, ScoringError>;
}

impl<F> PolarityScorer for F
where
    F: Fn(&str) -> Result<f64, ScoringError>,
{
    fn polarity(&self, text: &str) -> Result<f64, ScoringError> {
        self(text)
    }
}

/// What to do when the scorer fails on a row.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ScoringPolicy {
    /// Abort the whole call; the table is left untouched.
    #[default]
    Strict,
    /// Score failing rows as neutral (0.0) and count them.
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub scored: usize,
    /// Rows set to neutral after a scorer failure.
    pub defaulted: usize,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Score every row's `text_column` (after [`normalize`]) and store the result
/// in [`SENTIMENT_COLUMN`].
///
/// Rows are scored once each, in table order. Under [`ScoringPolicy::Strict`]
/// the first failure is returned and no column is written.
pub fn score_all<S: PolarityScorer + ?Sized>(
    table: &mut Table,
    text_column: &str,
    scorer: &S,
    policy: ScoringPolicy,
) -> Result<ScoreSummary, PipelineError> {
    let idx = table.column_index(text_column)?;

    let mut scores = Vec::with_capacity(table.len());
    let mut defaulted = 0;
    for (row_no, row) in table.rows.iter().enumerate() {
        let text = normalize(&row.get(idx).to_text());
        let score = match (scorer.polarity(&text), policy) {
            (Ok(p), _) => p,
            (Err(source), ScoringPolicy::Strict) => {
                return Err(PipelineError::Scoring { row: row_no, source })
            }
            (Err(_), ScoringPolicy::Neutral) => {
                defaulted += 1;
                0.0
            }
        };
        scores.push(Value::from_f64(score));
    }

    let scored = scores.len();
    table.set_column(SENTIMENT_COLUMN, scores);
    Ok(ScoreSummary { scored, defaulted })
}

/// Mean of `score_column` per `group_column`, ranked in `order`.
pub fn average_by(
    table: &Table,
    group_column: &str,
    score_column: &str,
    order: SortOrder,
    n: usize,
) -> Result<RankedAggregate, PipelineError> {
    mean_by(table, group_column, score_column, order, n)
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

/// Equal-width bin counts over `[lower, upper]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    pub lower: f64,
    pub upper: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len().max(1) as f64
    }

    /// Centre of bin `i`.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.lower + self.bin_width() * (i as f64 + 0.5)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Distribution of a polarity column over `[-1, 1]`. Values outside the
/// range fall in the edge bins; missing cells are skipped.
pub fn histogram(table: &Table, column: &str, bins: usize) -> Result<Histogram, PipelineError> {
    let bins = bins.max(1);
    let (lower, upper) = (-1.0, 1.0);
    let width = (upper - lower) / bins as f64;
    let mut counts = vec![0; bins];

    for (row_no, v) in table.column_values(column)?.enumerate() {
        if v.is_null() {
            continue;
        }
        let x = v.as_f64().ok_or_else(|| PipelineError::TypeMismatch {
            table: table.name.clone(),
            column: column.to_string(),
            row: row_no,
            found: v.type_name(),
        })?;
        let bin = (((x - lower) / width).floor().max(0.0) as usize).min(bins - 1);
        counts[bin] += 1;
    }

    Ok(Histogram {
        column: column.to_string(),
        lower,
        upper,
        counts,
    })
}
