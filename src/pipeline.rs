use log::{info, warn};

use crate::config::PipelineConfig;
use crate::data::aggregate::{top_by_count, top_by_mean, total_counts, RankedAggregate};
use crate::data::clean::clean;
use crate::data::lexicon::LexiconScorer;
use crate::data::loader::load;
use crate::data::model::Table;
use crate::data::outlier::detect_outliers;
use crate::data::sentiment::{histogram, score_all, PolarityScorer, SENTIMENT_COLUMN};
use crate::error::PipelineError;
use crate::report::{Ranking, RankingKind, Report, SkippedStep};

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Runs load → clean → outliers → sentiment → rankings over the two inputs.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run with the built-in lexicon scorer.
    pub fn run(&self) -> Result<Report, PipelineError> {
        self.run_with(&LexiconScorer::new())
    }

    /// Run with the given polarity scorer.
    ///
    /// Only load failures are returned as errors. Any later step that fails
    /// is recorded in [`Report::skipped`] and the run continues.
    pub fn run_with<S: PolarityScorer + ?Sized>(&self, scorer: &S) -> Result<Report, PipelineError> {
        let cfg = &self.config;
        let cols = &cfg.columns;
        let n = cfg.top_n;

        info!("Loading books from {}", cfg.books_path.display());
        let mut books = load(&cfg.books_path)?;
        info!("Loading reviews from {}", cfg.reviews_path.display());
        let mut reviews = load(&cfg.reviews_path)?;

        let mut report = Report::default();

        for table in [&mut books, &mut reviews] {
            let summary = clean(table);
            info!(
                "Cleaned {}: -{} missing, -{} duplicates, {} rows left",
                summary.table, summary.dropped_missing, summary.dropped_duplicates, summary.remaining
            );
            report.cleaning.push(summary);
        }

        for (step, table, column) in [
            ("book outliers", &books, &cols.ratings_count),
            ("review outliers", &reviews, &cols.review_score),
        ] {
            if let Some(o) = record(&mut report, step, detect_outliers(table, column)) {
                info!("{} anomalies in column '{}' of {}", o.count, o.column, o.table);
                report.outliers.push(o);
            }
        }

        let scored = record(
            &mut report,
            "sentiment scoring",
            score_all(&mut reviews, &cols.review_text, scorer, cfg.scoring_policy),
        );
        if let Some(s) = &scored {
            info!("Scored {} reviews ({} defaulted to neutral)", s.scored, s.defaulted);
        }
        report.scoring = scored;

        let books = &books;
        let reviews = &reviews;
        let mut rank = |kind: RankingKind, result: Result<RankedAggregate, PipelineError>| {
            let step = kind.title(n);
            if let Some(aggregate) = record(&mut report, &step, result) {
                info!("{step}: {} entries", aggregate.len());
                report.rankings.push(Ranking {
                    kind,
                    title: step,
                    aggregate,
                });
            }
        };

        rank(
            RankingKind::BooksByReviewCount,
            top_by_count(reviews, &cols.title, n),
        );
        rank(
            RankingKind::BooksByAverageRating,
            top_by_mean(books, &cols.title, &cols.rating, n),
        );
        if scored.is_some() {
            rank(
                RankingKind::BooksByAverageSentiment,
                top_by_mean(reviews, &cols.title, SENTIMENT_COLUMN, n),
            );
        }
        rank(
            RankingKind::AuthorsByBookCount,
            top_by_count(books, &cols.author, n),
        );
        rank(
            RankingKind::CategoriesByBookCount,
            top_by_count(books, &cols.category, n),
        );
        rank(
            RankingKind::CategoriesByAverageRating,
            top_by_mean(books, &cols.category, &cols.rating, n),
        );

        report.review_totals = record(
            &mut report,
            "review totals",
            total_counts(reviews, &cols.review_score),
        );
        if scored.is_some() {
            report.sentiment_histogram = record(
                &mut report,
                "sentiment histogram",
                histogram(reviews, SENTIMENT_COLUMN, cfg.histogram_bins),
            );
        }

        Ok(report)
    }
}

/// Keep a step's value, or log and note the skip.
fn record<T>(report: &mut Report, step: &str, result: Result<T, PipelineError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Skipped {step}: {e}");
            report.skipped.push(SkippedStep {
                step: step.to_string(),
                reason: e.to_string(),
            });
            None
        }
    }
}

/// Load and clean one input the way a run does. Useful for inspecting a
/// single file.
pub fn load_clean(path: &std::path::Path) -> Result<Table, PipelineError> {
    let mut table = load(path)?;
    clean(&mut table);
    Ok(table)
}
