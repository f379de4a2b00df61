use eframe::egui::{self, Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::color::series_palette;
use crate::data::model::ChartQuantity;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Temperature dependences (one line per frequency)
// ---------------------------------------------------------------------------

/// Plot the chosen quantity against temperature for every frequency series.
pub fn temperature_plot(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Quantity:");
        for q in ChartQuantity::ALL {
            ui.selectable_value(&mut state.chart_quantity, q, q.title());
        }
    });

    if state.series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Build temperature dependences to see them here.");
        });
        return;
    }

    let quantity = state.chart_quantity;
    let colors = series_palette(state.series.len());
    let highlighted = state.active_series().map(|s| s.frequency_hz);

    Plot::new("temperature_plot")
        .legend(Legend::default())
        .x_axis_label("Temperature, °C")
        .y_axis_label(quantity.title())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (series, &color) in state.series.iter().zip(&colors) {
                let points: Vec<[f64; 2]> = series
                    .chart_points(quantity)
                    .into_iter()
                    .filter(|[_, y]| y.is_finite())
                    .collect();
                let width = if highlighted == Some(series.frequency_hz) {
                    3.5
                } else {
                    1.5
                };
                let name = format!("f = {}", series.title());
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(&name)
                        .color(color)
                        .width(width),
                );
                plot_ui.points(Points::new(points).name(&name).color(color).radius(3.0));
            }
        });
}

// ---------------------------------------------------------------------------
// ε(f) of the active table
// ---------------------------------------------------------------------------

/// Plot the cached ε(f) curve of the active dataset, if it has been computed.
pub fn frequency_plot(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = state.active_dataset() else {
        return;
    };
    let Some(curve) = state.store.curve(dataset.label()) else {
        ui.label("Calculate ε to see ε(f) for this table.");
        return;
    };

    let points: Vec<[f64; 2]> = curve.iter().map(|p| [p.frequency_hz, p.epsilon]).collect();

    Plot::new(egui::Id::new(("frequency_plot", dataset.label())))
        .x_axis_label("Frequency, Hz")
        .y_axis_label("ε")
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points))
                    .name(dataset.label())
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
        });
}
