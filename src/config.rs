use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::aggregate::DEFAULT_TOP_N;
use crate::data::sentiment::{ScoringPolicy, DEFAULT_HISTOGRAM_BINS};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Column names the pipeline reads from the two inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Book title, present in both tables.
    pub title: String,
    /// Average rating of a book (books table).
    pub rating: String,
    pub author: String,
    pub category: String,
    /// Number of ratings of a book (books table).
    pub ratings_count: String,
    pub review_text: String,
    pub review_score: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            title: "book_title".into(),
            rating: "rating".into(),
            author: "author".into(),
            category: "category".into(),
            ratings_count: "ratingsCount".into(),
            review_text: "review/text".into(),
            review_score: "review/score".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline configuration
// ---------------------------------------------------------------------------

/// Settings for one pipeline run. Every field has a default, so a config
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub books_path: PathBuf,
    pub reviews_path: PathBuf,
    pub columns: ColumnConfig,
    pub top_n: usize,
    pub scoring_policy: ScoringPolicy,
    pub histogram_bins: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            books_path: PathBuf::from("data/books_data.csv"),
            reviews_path: PathBuf::from("data/books_rating.csv"),
            columns: ColumnConfig::default(),
            top_n: DEFAULT_TOP_N,
            scoring_policy: ScoringPolicy::default(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file; absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
