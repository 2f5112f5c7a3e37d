use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{insights, panels, plot, preview};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct DataLensApp {
    pub state: AppState,
}

impl eframe::App for DataLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: sheet, columns, chart config ----
        egui::SidePanel::left("config_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabbed content ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    if ui
                        .selectable_label(self.state.active_tab == tab, tab.label())
                        .clicked()
                    {
                        self.state.active_tab = tab;
                    }
                }
            });
            ui.separator();

            match self.state.active_tab {
                Tab::Preview => preview::preview_table(ui, &self.state),
                Tab::Chart => plot::chart(ui, &self.state),
                Tab::Insights => insights::insights_panel(ui, &self.state),
                Tab::Report => insights::report_panel(ui, &mut self.state),
            }
        });
    }
}
