use eframe::egui::{self, Color32, Key, RichText, ScrollArea, Ui};

use crate::data::device::REGISTRY;
use crate::state::{AppState, Level, Tab};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export all tables…").clicked() {
                export_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label("Instrument:");
        let mut selected = state.device;
        egui::ComboBox::from_id_salt("instrument")
            .selected_text(selected.name)
            .show_ui(ui, |ui: &mut Ui| {
                for &schema in REGISTRY {
                    ui.selectable_value(&mut selected, schema, schema.name);
                }
            });
        state.select_device(selected);

        ui.separator();
        ui.label(format!(
            "{} tables loaded, {} visible",
            state.store.len(),
            state.visible().len()
        ));
    });
}

// ---------------------------------------------------------------------------
// Left side panel – geometry and actions
// ---------------------------------------------------------------------------

/// Render the left panel: sample geometry, calculation and aggregation.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sample");
    ui.separator();

    egui::Grid::new("geometry").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("Thickness, mm");
        ui.text_edit_singleline(&mut state.thickness_input);
        ui.end_row();
        ui.label("Diameter, mm");
        ui.text_edit_singleline(&mut state.diameter_input);
        ui.end_row();
    });

    ui.add_space(6.0);
    if ui.button("Calculate ε, ε′, ε″").clicked() {
        state.calculate();
    }
    if ui.button("Build temperature dependences").clicked() {
        state.aggregate();
    }

    ui.add_space(12.0);
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Messages");
        if !state.notices.is_empty() && ui.small_button("Clear").clicked() {
            state.clear_notices();
        }
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui: &mut Ui| {
            for notice in &state.notices {
                let color = match notice.level {
                    Level::Info => ui.visuals().text_color(),
                    Level::Warning => Color32::from_rgb(230, 160, 30),
                    Level::Error => Color32::RED,
                };
                ui.label(RichText::new(&notice.message).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Tab strip – temperature tables, then frequency tables
// ---------------------------------------------------------------------------

/// Render the tab strip. Double-click a table tab to rename it; Enter or
/// leaving the field confirms, Escape cancels.
pub fn tab_strip(ui: &mut Ui, state: &mut AppState) {
    let labels: Vec<String> = state
        .visible()
        .iter()
        .map(|d| d.label().to_string())
        .collect();
    let titles: Vec<String> = state.series.iter().map(|s| s.title()).collect();

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            for label in &labels {
                let editing = state.renaming.as_ref().is_some_and(|r| &r.label == label);
                if editing {
                    rename_field(ui, state);
                    continue;
                }
                let tab = Tab::Dataset(label.clone());
                let selected = state.active_tab.as_ref() == Some(&tab);
                let response = ui.selectable_label(selected, label);
                if response.clicked() {
                    state.active_tab = Some(tab);
                }
                if response.double_clicked() {
                    state.begin_rename(label);
                }
            }

            if !titles.is_empty() {
                ui.separator();
            }
            for (i, title) in titles.iter().enumerate() {
                let tab = Tab::Frequency(i);
                let selected = state.active_tab.as_ref() == Some(&tab);
                if ui.selectable_label(selected, title).clicked() {
                    state.active_tab = Some(tab);
                }
            }
        });
    });
}

fn rename_field(ui: &mut Ui, state: &mut AppState) {
    let Some(edit) = state.renaming.as_mut() else {
        return;
    };
    let response = ui.add(egui::TextEdit::singleline(&mut edit.text).desired_width(90.0));
    if !response.has_focus() && !response.lost_focus() {
        response.request_focus();
    }

    if ui.input(|i| i.key_pressed(Key::Escape)) {
        state.cancel_rename();
    } else if response.lost_focus() {
        // Enter also ends editing by dropping focus.
        state.confirm_rename();
    }
}

// ---------------------------------------------------------------------------
// Export prompt
// ---------------------------------------------------------------------------

/// Modal-style window asking for the export project name.
pub fn export_prompt(ctx: &egui::Context, state: &mut AppState) {
    let Some(prompt) = state.export_prompt.as_mut() else {
        return;
    };
    let mut confirm = false;
    let mut cancel = false;

    egui::Window::new("Project folder name")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label(format!("Create a project folder in {}:", prompt.base.display()));
            let response = ui.text_edit_singleline(&mut prompt.name);
            if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                confirm = true;
            }
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("OK").clicked() {
                    confirm = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        });

    if confirm {
        state.confirm_export();
    } else if cancel {
        state.export_prompt = None;
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Select one or more instrument exports")
        .add_filter("Text files", &["txt"])
        .pick_files();

    if let Some(paths) = files {
        state.load_files(&paths);
    }
}

pub fn export_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Choose a folder for the exported tables")
        .pick_folder();

    if let Some(base) = folder {
        state.begin_export(base);
    }
}
