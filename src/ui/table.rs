use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Tabular, ERROR_MARKER};

// ---------------------------------------------------------------------------
// Read-only grid for any table
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 18.0;

/// Render `table` as a scrollable grid. Error-marked cells are shown in red.
pub fn data_grid<T: Tabular + ?Sized>(ui: &mut Ui, id: &str, table: &T) {
    let titles = table.column_titles();
    let rows = table.row_count();

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(70.0), titles.len())
            .header(22.0, |mut header| {
                for title in &titles {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows, |mut row| {
                    let r = row.index();
                    for c in 0..titles.len() {
                        let text = table.cell(r, c).unwrap_or_default();
                        row.col(|ui: &mut Ui| {
                            if text == ERROR_MARKER {
                                let color = ui.visuals().error_fg_color;
                                ui.label(RichText::new(text).color(color));
                            } else {
                                ui.label(text);
                            }
                        });
                    }
                });
            });
    });
}
