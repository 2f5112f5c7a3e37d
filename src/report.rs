//! Self-contained HTML profile report for a loaded table.
//!
//! The rest of the application treats the produced document as opaque: it
//! is written to disk verbatim and never parsed or edited.

use std::fmt::Write as _;

use crate::data::insight::{mean, pearson, sample_std};
use crate::data::model::{ColumnKind, Table};

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2em auto; max-width: 60em; color: #222; }\n\
h1 { border-bottom: 2px solid #4a7db3; padding-bottom: 0.2em; }\n\
h2 { color: #4a7db3; margin-top: 1.6em; }\n\
table { border-collapse: collapse; margin: 0.8em 0; }\n\
th, td { border: 1px solid #ccc; padding: 0.3em 0.8em; text-align: right; }\n\
th { background: #eef3f8; text-align: left; }\n\
.colname { font-weight: bold; text-align: left; }\n";

/// Render the full profile report for `table` as one self-contained HTML
/// document (inline CSS, no external assets).
pub fn profile_html(source: &str, table: &Table) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Profile: {title}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n\
         <h1>Data profile — {title}</h1>\n",
        title = escape(source),
    );

    overview_section(&mut html, table);
    columns_section(&mut html, table);
    correlation_section(&mut html, table);

    html.push_str("</body>\n</html>\n");
    html
}

fn overview_section(html: &mut String, table: &Table) {
    let missing: usize = table.columns().iter().map(|c| c.null_count()).sum();
    let cells = table.n_rows() * table.n_cols();
    let missing_pct = if cells == 0 {
        0.0
    } else {
        100.0 * missing as f64 / cells as f64
    };
    let numeric = table.numeric_columns().len();

    html.push_str("<h2>Overview</h2>\n<table>\n");
    let _ = write!(
        html,
        "<tr><th>Rows</th><td>{}</td></tr>\n\
         <tr><th>Columns</th><td>{}</td></tr>\n\
         <tr><th>Numeric columns</th><td>{numeric}</td></tr>\n\
         <tr><th>Missing cells</th><td>{missing} ({missing_pct:.1}%)</td></tr>\n",
        table.n_rows(),
        table.n_cols(),
    );
    html.push_str("</table>\n");
}

fn columns_section(html: &mut String, table: &Table) {
    html.push_str("<h2>Columns</h2>\n<table>\n");
    html.push_str(
        "<tr><th>Column</th><th>Type</th><th>Missing</th><th>Distinct</th>\
         <th>Mean</th><th>Std dev</th><th>Min</th><th>Max</th></tr>\n",
    );

    for col in table.columns() {
        let distinct = col.unique_values().len();
        let (mean_s, std_s, min_s, max_s) = if col.kind == ColumnKind::Numeric {
            let xs = col.as_f64_lossy();
            let finite: Vec<f64> = xs.into_iter().filter(|x| x.is_finite()).collect();
            let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
            let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (
                mean(&finite).map(|m| format!("{m:.3}")).unwrap_or_default(),
                sample_std(&finite)
                    .map(|s| format!("{s:.3}"))
                    .unwrap_or_default(),
                if finite.is_empty() {
                    String::new()
                } else {
                    format!("{min}")
                },
                if finite.is_empty() {
                    String::new()
                } else {
                    format!("{max}")
                },
            )
        } else {
            Default::default()
        };

        let _ = write!(
            html,
            "<tr><td class=\"colname\">{}</td><td>{}</td><td>{}</td><td>{distinct}</td>\
             <td>{mean_s}</td><td>{std_s}</td><td>{min_s}</td><td>{max_s}</td></tr>\n",
            escape(&col.name),
            col.kind,
            col.null_count(),
        );
    }
    html.push_str("</table>\n");
}

fn correlation_section(html: &mut String, table: &Table) {
    let numeric = table.numeric_columns();
    if numeric.len() < 2 {
        return;
    }
    let series: Vec<(&str, Vec<f64>)> = numeric
        .iter()
        .map(|c| (c.name.as_str(), c.as_f64_lossy()))
        .collect();

    html.push_str("<h2>Correlations (Pearson)</h2>\n<table>\n<tr><th></th>");
    for (name, _) in &series {
        let _ = write!(html, "<th>{}</th>", escape(name));
    }
    html.push_str("</tr>\n");

    for (i, (name, xs)) in series.iter().enumerate() {
        let _ = write!(html, "<tr><td class=\"colname\">{}</td>", escape(name));
        for (j, (_, ys)) in series.iter().enumerate() {
            if i == j {
                html.push_str("<td>1.00</td>");
            } else {
                match pearson(xs, ys) {
                    Some(r) => {
                        let _ = write!(html, "<td>{r:.2}</td>");
                    }
                    None => html.push_str("<td>–</td>"),
                }
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
