use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

use crate::data::model::{Table, Value};
use crate::state::{AppState, ChartKind};

// ---------------------------------------------------------------------------
// User-configured chart (central panel)
// ---------------------------------------------------------------------------

/// Render the chart tab from the current chart configuration.
pub fn chart(ui: &mut Ui, state: &AppState) {
    let Some(table) = state.current_table() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to chart its columns  (File → Open…)");
        });
        return;
    };

    let (Some(x_name), Some(y_name)) = (
        state.chart.x_column.as_deref(),
        state.chart.y_column.as_deref(),
    ) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Pick numeric X and Y columns in the side panel");
        });
        return;
    };
    let (Some(x_col), Some(y_col)) = (table.column(x_name), table.column(y_name)) else {
        return;
    };

    let xs = x_col.as_f64_lossy();
    let ys = y_col.as_f64_lossy();

    Plot::new("column_chart")
        .legend(egui_plot::Legend::default())
        .x_axis_label(x_name)
        .y_axis_label(y_name)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| match state.chart.kind {
            ChartKind::Scatter => scatter(plot_ui, state, table, &xs, &ys),
            ChartKind::Line => {
                let points: PlotPoints = point_pairs(&xs, &ys).into_iter().collect();
                plot_ui.line(
                    Line::new(points)
                        .name(format!("{x_name} vs {y_name}"))
                        .color(Color32::LIGHT_BLUE)
                        .width(1.5),
                );
            }
            ChartKind::Bar => {
                let bars: Vec<Bar> = point_pairs(&xs, &ys)
                    .into_iter()
                    .map(|[x, y]| Bar::new(x, y))
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(y_name)
                        .color(Color32::LIGHT_BLUE),
                );
            }
        });
}

/// Scatter points, split into one series per color-by value when a colour
/// map is active so the legend lists the categories.
fn scatter(
    plot_ui: &mut egui_plot::PlotUi,
    state: &AppState,
    table: &Table,
    xs: &[f64],
    ys: &[f64],
) {
    let color_col = state
        .chart
        .color_column
        .as_deref()
        .and_then(|name| table.column(name));

    match (color_col, &state.color_map) {
        (Some(col), Some(cm)) => {
            for value in col.unique_values() {
                let points: PlotPoints = xs
                    .iter()
                    .zip(ys)
                    .zip(&col.values)
                    .filter(|((x, y), v)| {
                        x.is_finite() && y.is_finite() && **v == value
                    })
                    .map(|((&x, &y), _)| [x, y])
                    .collect();
                let label = match &value {
                    Value::Null => "(missing)".to_string(),
                    other => other.to_string(),
                };
                plot_ui.points(
                    Points::new(points)
                        .name(label)
                        .color(cm.color_for(&value))
                        .radius(2.5),
                );
            }
        }
        _ => {
            let points: PlotPoints = point_pairs(xs, ys).into_iter().collect();
            plot_ui.points(
                Points::new(points)
                    .color(Color32::LIGHT_BLUE)
                    .radius(2.5),
            );
        }
    }
}

/// Finite (x, y) pairs in row order.
fn point_pairs(xs: &[f64], ys: &[f64]) -> Vec<[f64; 2]> {
    xs.iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| [x, y])
        .collect()
}
