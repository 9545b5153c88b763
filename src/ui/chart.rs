use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::state::{ChartState, View};

// ---------------------------------------------------------------------------
// Bar chart (central panel)
// ---------------------------------------------------------------------------

/// Render the current ranking or histogram in the central panel.
pub fn ranking_chart(ui: &mut Ui, state: &ChartState) {
    match state.view {
        Some(View::Ranking(_)) => ranking_bars(ui, state),
        Some(View::SentimentHistogram) => histogram_bars(ui, state),
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Nothing to chart: every ranking was skipped");
            });
        }
    }
}

fn bar_color(state: &ChartState, i: usize) -> Color32 {
    state.colors.get(i).copied().unwrap_or(Color32::LIGHT_BLUE)
}

/// Horizontal bars, rank 1 at the top.
fn ranking_bars(ui: &mut Ui, state: &ChartState) {
    let Some(ranking) = state.current_ranking() else {
        return;
    };
    let agg = &ranking.aggregate;
    let n = agg.len();

    let bars: Vec<Bar> = agg
        .entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            Bar::new((n - i) as f64, e.value)
                .name(format!("{}. {}", i + 1, e.key.to_text()))
                .fill(bar_color(state, i))
                .width(0.7)
        })
        .collect();

    let chart = BarChart::new(bars).horizontal().name(&ranking.title);
    let x_label = match &agg.value_column {
        Some(col) => format!("mean {col}"),
        None => "count".to_string(),
    };

    Plot::new("ranking_chart")
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(agg.key_column.clone())
        .show_y(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

/// Vertical bars over the polarity range.
fn histogram_bars(ui: &mut Ui, state: &ChartState) {
    let Some(hist) = &state.report.sentiment_histogram else {
        return;
    };
    let width = hist.bin_width();

    let bars: Vec<Bar> = hist
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            Bar::new(hist.bin_center(i), count as f64)
                .width(width * 0.95)
                .fill(bar_color(state, i))
        })
        .collect();

    Plot::new("sentiment_histogram")
        .x_axis_label("Sentiment score")
        .y_axis_label("Frequency")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Sentiment distribution"));
        });
}
