use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::state::AppState;

/// At most this many rows are rendered in the preview grid.
const PREVIEW_ROWS: usize = 100;

/// Render the row-preview tab: table dimensions plus the first rows in a
/// scrollable grid.
pub fn preview_table(ui: &mut Ui, state: &AppState) {
    let Some(table) = state.current_table() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to preview its rows  (File → Open…)");
        });
        return;
    };

    if table.is_empty() {
        ui.label("This sheet has no rows.");
        return;
    }

    let shown = table.n_rows().min(PREVIEW_ROWS);
    ui.label(format!(
        "Showing {shown} of {} rows × {} columns",
        table.n_rows(),
        table.n_cols()
    ));
    ui.separator();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(TableColumn::auto().at_least(60.0), table.n_cols())
        .header(22.0, |mut header| {
            for col in table.columns() {
                header.col(|ui: &mut Ui| {
                    ui.strong(&col.name);
                    ui.weak(format!("{}", col.kind));
                });
            }
        })
        .body(|body| {
            body.rows(18.0, shown, |mut row| {
                let idx = row.index();
                for col in table.columns() {
                    row.col(|ui: &mut Ui| {
                        ui.label(col.values[idx].to_string());
                    });
                }
            });
        });
}
