use eframe::egui::Color32;
use rusty_shelf::report::{Ranking, RankingKind};
use rusty_shelf::Report;

use crate::color::{diverging_color, sequential_palette, Scheme};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// What the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Index into `Report::rankings`.
    Ranking(usize),
    SentimentHistogram,
}

/// The full UI state, independent of rendering.
pub struct ChartState {
    pub report: Report,
    /// `None` when the run produced nothing to chart.
    pub view: Option<View>,
    /// Bar colours for the current view, one per bar.
    pub colors: Vec<Color32>,
}

impl ChartState {
    pub fn new(report: Report) -> Self {
        let view = if !report.rankings.is_empty() {
            Some(View::Ranking(0))
        } else if report.sentiment_histogram.is_some() {
            Some(View::SentimentHistogram)
        } else {
            None
        };
        let mut state = Self {
            report,
            view,
            colors: Vec::new(),
        };
        state.rebuild_colors();
        state
    }

    /// Ranking behind the current view, if any.
    pub fn current_ranking(&self) -> Option<&Ranking> {
        match self.view? {
            View::Ranking(i) => self.report.rankings.get(i),
            View::SentimentHistogram => None,
        }
    }

    /// Switch view and recolour.
    pub fn select(&mut self, view: View) {
        self.view = Some(view);
        self.rebuild_colors();
    }

    fn rebuild_colors(&mut self) {
        self.colors = match self.view {
            Some(View::Ranking(i)) => match self.report.rankings.get(i) {
                Some(r) if r.kind == RankingKind::BooksByAverageSentiment => r
                    .aggregate
                    .entries
                    .iter()
                    .map(|e| diverging_color(e.value))
                    .collect(),
                Some(r) => sequential_palette(scheme_for(r.kind), r.aggregate.len()),
                None => Vec::new(),
            },
            Some(View::SentimentHistogram) => match &self.report.sentiment_histogram {
                Some(h) => (0..h.counts.len())
                    .map(|i| diverging_color(h.bin_center(i)))
                    .collect(),
                None => Vec::new(),
            },
            None => Vec::new(),
        };
    }
}

fn scheme_for(kind: RankingKind) -> Scheme {
    match kind {
        RankingKind::BooksByReviewCount | RankingKind::AuthorsByBookCount => Scheme::Viridis,
        _ => Scheme::Magma,
    }
}
