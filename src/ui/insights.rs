use anyhow::Context as _;
use eframe::egui::{RichText, ScrollArea, Ui};

use crate::data::model::Evidence;
use crate::report;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Insights tab
// ---------------------------------------------------------------------------

/// Render the automated findings for the current table.
pub fn insights_panel(ui: &mut Ui, state: &AppState) {
    if state.current_table().is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to see automated insights  (File → Open…)");
        });
        return;
    }

    ui.heading("Automated insights");
    ui.separator();

    if state.insights.is_empty() {
        ui.label("No numeric columns — nothing to report for this sheet.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for insight in &state.insights {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    ui.label("💡");
                    ui.label(RichText::new(&insight.summary).strong());
                });
                ui.weak(evidence_detail(&insight.evidence));
                ui.add_space(6.0);
            }
        });
}

/// The raw numbers backing an insight, shown under its summary.
fn evidence_detail(evidence: &Evidence) -> String {
    match evidence {
        Evidence::Correlation {
            left,
            right,
            coefficient,
        } => format!("Pearson r({left}, {right}) = {coefficient:.4}"),
        Evidence::Variability { column, std_dev } => {
            format!("sample std dev of {column} = {std_dev:.4}")
        }
        Evidence::Range { column, min, max } => {
            format!("min({column}) = {min}, max({column}) = {max}")
        }
    }
}

// ---------------------------------------------------------------------------
// Report tab
// ---------------------------------------------------------------------------

/// Render the profile-report tab: one button that generates the HTML
/// document and saves it where the user points.
pub fn report_panel(ui: &mut Ui, state: &mut AppState) {
    if state.current_table().is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to generate a profile report  (File → Open…)");
        });
        return;
    }

    ui.heading("Profile report");
    ui.separator();
    ui.label(
        "Generates a self-contained HTML document with per-column statistics, \
         missing-value counts, and the correlation matrix.",
    );
    ui.add_space(8.0);

    if ui.button("Generate report…").clicked() {
        match generate_and_save(state) {
            Ok(Some(path)) => {
                log::info!("Profile report written to {}", path.display());
                state.status_message = Some(format!("Report saved to {}", path.display()));
            }
            Ok(None) => {} // dialog cancelled
            Err(e) => {
                log::error!("Report generation failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

/// Build the report and write it to a user-chosen path.  `Ok(None)` when
/// the save dialog was cancelled.
fn generate_and_save(state: &AppState) -> anyhow::Result<Option<std::path::PathBuf>> {
    let table = state
        .current_table()
        .context("no table is currently loaded")?;
    let source = state.source_name.as_deref().unwrap_or("data");

    let html = report::profile_html(source, table);

    let default_name = format!(
        "{}_profile.html",
        source.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(source)
    );
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save profile report")
        .set_file_name(&default_name)
        .add_filter("HTML", &["html"])
        .save_file()
    else {
        return Ok(None);
    };

    std::fs::write(&path, html)
        .with_context(|| format!("writing report to {}", path.display()))?;
    Ok(Some(path))
}
