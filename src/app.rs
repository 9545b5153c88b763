use eframe::egui;
use rusty_shelf::Report;

use crate::state::ChartState;
use crate::ui::{chart, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ShelfApp {
    pub state: ChartState,
}

impl ShelfApp {
    pub fn new(report: Report) -> Self {
        Self {
            state: ChartState::new(report),
        }
    }
}

impl eframe::App for ShelfApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: run summary ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: ranking picker + table ----
        egui::SidePanel::left("ranking_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            chart::ranking_chart(ui, &self.state);
        });
    }
}

/// Open the viewer window and block until it is closed.
pub fn show(report: Report) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Shelf – Rankings",
        options,
        Box::new(|_cc| Ok(Box::new(ShelfApp::new(report)))),
    )
    .map_err(|e| anyhow::anyhow!("chart viewer failed: {e}"))
}
