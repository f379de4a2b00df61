use eframe::egui::{self, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DielectricLabApp {
    pub state: AppState,
}

impl DielectricLabApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DielectricLabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: geometry, actions, messages ----
        egui::SidePanel::left("sample_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: chart ----
        egui::TopBottomPanel::bottom("chart_panel")
            .default_height(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                if self.state.active_dataset().is_some() {
                    plot::frequency_plot(ui, &self.state);
                } else {
                    plot::temperature_plot(ui, &mut self.state);
                }
            });

        // ---- Central panel: tabs and the active table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::tab_strip(ui, &mut self.state);
            ui.separator();
            active_table(ui, &self.state);
        });

        panels::export_prompt(ctx, &mut self.state);
    }
}

fn active_table(ui: &mut Ui, state: &AppState) {
    if let Some(dataset) = state.active_dataset() {
        table::data_grid(ui, dataset.label(), dataset);
    } else if let Some(series) = state.active_series() {
        table::data_grid(ui, &series.title(), series);
    } else if state.store.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open instrument exports to begin  (File → Open…)");
        });
    } else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Select a table tab.");
        });
    }
}
