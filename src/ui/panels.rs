use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::ColumnKind;
use crate::state::{AppState, ChartKind};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / status bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(name), Some(table)) = (&state.source_name, state.current_table()) {
            ui.label(format!(
                "{name} — {} rows × {} columns",
                table.n_rows(),
                table.n_cols()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – sheet, columns, chart configuration
// ---------------------------------------------------------------------------

/// Render the left configuration panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data");
    ui.separator();

    let Some(collection) = state.collection.clone() else {
        ui.label("No file loaded.");
        ui.label("File → Open… to pick a .csv, .xlsx or .xls file.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Sheet picker (multi-sheet workbooks only) ----
            if collection.len() > 1 {
                ui.strong("Sheet");
                let current = state.selected_sheet.clone().unwrap_or_default();
                egui::ComboBox::from_id_salt("sheet_picker")
                    .selected_text(&current)
                    .show_ui(ui, |ui: &mut Ui| {
                        for name in collection.sheet_names() {
                            if ui.selectable_label(current == name, name).clicked() {
                                state.select_sheet(name.to_string());
                            }
                        }
                    });
                ui.separator();
            }

            let Some(table) = state.current_table() else {
                ui.label("Pick a sheet to analyze.");
                return;
            };

            // ---- Column list ----
            ui.strong("Columns");
            let columns: Vec<(String, ColumnKind)> = table
                .columns()
                .iter()
                .map(|c| (c.name.clone(), c.kind))
                .collect();
            let numeric: Vec<String> = table
                .numeric_columns()
                .iter()
                .map(|c| c.name.clone())
                .collect();
            let categorical: Vec<String> = table
                .columns()
                .iter()
                .filter(|c| c.kind == ColumnKind::Text)
                .map(|c| c.name.clone())
                .collect();

            for (name, kind) in &columns {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(name);
                    ui.weak(format!("({kind})"));
                });
            }
            ui.separator();

            // ---- Chart configuration ----
            ui.strong("Chart");
            egui::ComboBox::from_id_salt("chart_kind")
                .selected_text(state.chart.kind.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for kind in ChartKind::ALL {
                        if ui
                            .selectable_label(state.chart.kind == kind, kind.label())
                            .clicked()
                        {
                            state.chart.kind = kind;
                        }
                    }
                });

            if numeric.is_empty() {
                ui.weak("No numeric columns to chart.");
            } else {
                column_picker(ui, "x_column", "X axis", &numeric, &mut state.chart.x_column);
                column_picker(ui, "y_column", "Y axis", &numeric, &mut state.chart.y_column);

                // Color-by only makes sense for scatter points.
                if state.chart.kind == ChartKind::Scatter && !categorical.is_empty() {
                    ui.strong("Color by");
                    let current = state
                        .chart
                        .color_column
                        .clone()
                        .unwrap_or_else(|| "(none)".to_string());
                    let mut changed: Option<Option<String>> = None;
                    egui::ComboBox::from_id_salt("color_column")
                        .selected_text(&current)
                        .show_ui(ui, |ui: &mut Ui| {
                            if ui.selectable_label(current == "(none)", "(none)").clicked() {
                                changed = Some(None);
                            }
                            for name in &categorical {
                                if ui.selectable_label(&current == name, name).clicked() {
                                    changed = Some(Some(name.clone()));
                                }
                            }
                        });
                    if let Some(column) = changed {
                        state.set_color_column(column);
                    }
                }
            }
        });
}

/// A labelled combo box choosing one column name out of `options`.
fn column_picker(
    ui: &mut Ui,
    id: &str,
    label: &str,
    options: &[String],
    selection: &mut Option<String>,
) {
    ui.strong(label);
    let current = selection.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt(id)
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for name in options {
                if ui.selectable_label(&current == name, name).clicked() {
                    *selection = Some(name.clone());
                }
            }
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tabular data")
        .add_filter("Supported files", &["csv", "xlsx", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx", "xls"])
        .pick_file();

    if let Some(path) = file {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        match std::fs::read(&path) {
            Ok(bytes) => state.load_from_bytes(&bytes, &filename),
            Err(e) => {
                log::error!("Failed to read {}: {e}", path.display());
                state.status_message = Some(format!("Error: could not read file: {e}"));
            }
        }
    }
}
