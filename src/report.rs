use std::fmt;

use serde::Serialize;

use crate::data::aggregate::{RankedAggregate, Totals};
use crate::data::clean::CleanSummary;
use crate::data::outlier::OutlierReport;
use crate::data::sentiment::{Histogram, ScoreSummary};

/// Which ranking a [`Ranking`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingKind {
    BooksByReviewCount,
    BooksByAverageRating,
    BooksByAverageSentiment,
    AuthorsByBookCount,
    CategoriesByBookCount,
    CategoriesByAverageRating,
}

impl RankingKind {
    pub fn title(&self, n: usize) -> String {
        match self {
            RankingKind::BooksByReviewCount => format!("Top {n} books by number of reviews"),
            RankingKind::BooksByAverageRating => format!("Top {n} books by average rating"),
            RankingKind::BooksByAverageSentiment => format!("Top {n} books by average sentiment"),
            RankingKind::AuthorsByBookCount => format!("Top {n} authors by number of books"),
            RankingKind::CategoriesByBookCount => format!("Top {n} categories by number of books"),
            RankingKind::CategoriesByAverageRating => {
                format!("Top {n} categories by average rating")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    pub kind: RankingKind,
    pub title: String,
    #[serde(flatten)]
    pub aggregate: RankedAggregate,
}

/// A step that did not produce a result, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedStep {
    pub step: String,
    pub reason: String,
}

/// Everything one pipeline run produced. Steps that failed leave no entry
/// in their section and are listed in `skipped` instead.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub cleaning: Vec<CleanSummary>,
    pub outliers: Vec<OutlierReport>,
    pub scoring: Option<ScoreSummary>,
    pub rankings: Vec<Ranking>,
    pub review_totals: Option<Totals>,
    pub sentiment_histogram: Option<Histogram>,
    pub skipped: Vec<SkippedStep>,
}

impl Report {
    pub fn ranking(&self, kind: RankingKind) -> Option<&Ranking> {
        self.rankings.iter().find(|r| r.kind == kind)
    }

    pub fn was_skipped(&self, step: &str) -> bool {
        self.skipped.iter().any(|s| s.step == step)
    }
}

/// Envelope for `--json` output.
#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Cleaning ==")?;
        for c in &self.cleaning {
            writeln!(
                f,
                "{}: dropped {} rows with missing values, {} duplicates; {} rows remain",
                c.table, c.dropped_missing, c.dropped_duplicates, c.remaining
            )?;
        }

        writeln!(f, "\n== Outliers ==")?;
        for o in &self.outliers {
            match &o.fences {
                Some(fe) => writeln!(
                    f,
                    "{} / {}: {} outside [{:.3}, {:.3}]",
                    o.table, o.column, o.count, fe.lower, fe.upper
                )?,
                None => writeln!(f, "{} / {}: no numeric values", o.table, o.column)?,
            }
        }

        if let Some(t) = &self.review_totals {
            writeln!(f, "\nTotal reviews: {}, total ratings: {}", t.rows, t.non_null)?;
        }

        for r in &self.rankings {
            writeln!(f, "\n== {} ==", r.title)?;
            write!(f, "{}", r.aggregate)?;
        }

        if !self.skipped.is_empty() {
            writeln!(f, "\n== Skipped ==")?;
            for s in &self.skipped {
                writeln!(f, "{}: {}", s.step, s.reason)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::{MetricKind, RankedEntry};
    use crate::data::model::Value;

    #[test]
    fn text_report_lists_rankings_and_skips() {
        let report = Report {
            rankings: vec![Ranking {
                kind: RankingKind::BooksByReviewCount,
                title: RankingKind::BooksByReviewCount.title(2),
                aggregate: RankedAggregate {
                    key_column: "book_title".into(),
                    value_column: None,
                    metric: MetricKind::Count,
                    entries: vec![RankedEntry {
                        key: Value::from("Dune"),
                        value: 3.0,
                    }],
                },
            }],
            skipped: vec![SkippedStep {
                step: "authors".into(),
                reason: "column 'author' not found in table 'books'".into(),
            }],
            ..Default::default()
        };
        let text = report.to_string();
        assert!(text.contains("== Top 2 books by number of reviews =="));
        assert!(text.contains("  1. Dune  3"));
        assert!(text.contains("authors: column 'author' not found"));
    }

    #[test]
    fn json_ranking_is_flattened() {
        let ranking = Ranking {
            kind: RankingKind::BooksByAverageRating,
            title: "t".into(),
            aggregate: RankedAggregate {
                key_column: "book_title".into(),
                value_column: Some("rating".into()),
                metric: MetricKind::Mean,
                entries: vec![],
            },
        };
        let json = serde_json::to_value(&ranking).unwrap();
        assert_eq!(json["kind"], "books_by_average_rating");
        assert_eq!(json["metric"], "mean");
        assert_eq!(json["value_column"], "rating");
    }
}
