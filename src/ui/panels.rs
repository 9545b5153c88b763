use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::{ChartState, View};

// ---------------------------------------------------------------------------
// Left side panel – view picker and ranking table
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut ChartState) {
    ui.heading("Rankings");
    ui.separator();

    // Clone what we need so we can mutate state inside the loop.
    let titles: Vec<String> = state.report.rankings.iter().map(|r| r.title.clone()).collect();
    let has_histogram = state.report.sentiment_histogram.is_some();

    for (i, title) in titles.iter().enumerate() {
        let view = View::Ranking(i);
        if ui.selectable_label(state.view == Some(view), title).clicked() {
            state.select(view);
        }
    }
    if has_histogram {
        let view = View::SentimentHistogram;
        if ui
            .selectable_label(state.view == Some(view), "Sentiment distribution")
            .clicked()
        {
            state.select(view);
        }
    }

    if !state.report.skipped.is_empty() {
        ui.separator();
        ui.strong("Skipped");
        for s in &state.report.skipped {
            ui.label(RichText::new(format!("{}: {}", s.step, s.reason)).color(Color32::RED));
        }
    }

    ui.separator();
    ranking_table(ui, state);
}

/// Entries of the selected ranking as a two-column table.
fn ranking_table(ui: &mut Ui, state: &ChartState) {
    let Some(ranking) = state.current_ranking() else {
        return;
    };
    let agg = &ranking.aggregate;
    let metric_header = agg
        .value_column
        .as_deref()
        .map(|c| format!("mean {c}"))
        .unwrap_or_else(|| "count".to_string());

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto())
            .column(Column::remainder().at_least(120.0))
            .column(Column::auto())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                header.col(|ui| {
                    ui.strong(&agg.key_column);
                });
                header.col(|ui| {
                    ui.strong(&metric_header);
                });
            })
            .body(|mut body| {
                for (i, e) in agg.entries.iter().enumerate() {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label((i + 1).to_string());
                        });
                        row.col(|ui| {
                            ui.label(e.key.to_text());
                        });
                        row.col(|ui| {
                            ui.label(agg.format_value(e.value));
                        });
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the run summary bar.
pub fn top_bar(ui: &mut Ui, state: &ChartState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        for c in &state.report.cleaning {
            ui.label(format!("{}: {} rows", c.table, c.remaining));
            ui.separator();
        }
        for o in &state.report.outliers {
            ui.label(format!("{} outliers in {}", o.count, o.column));
            ui.separator();
        }
        if let Some(t) = &state.report.review_totals {
            ui.label(format!("{} reviews, {} ratings", t.rows, t.non_null));
        }
    });
}
