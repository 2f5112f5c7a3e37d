use super::model::{Evidence, Insight, Table};

/// Pairwise correlations weaker than this are not worth surfacing.
pub const CORRELATION_THRESHOLD: f64 = 0.7;

// ---------------------------------------------------------------------------
// Insight extraction
// ---------------------------------------------------------------------------

/// Derive the ordered insight list for one table.
///
/// Never fails: with no numeric columns the list is empty, and each step is
/// independently best-effort, so an unusable statistic is skipped rather
/// than aborting the rest.
pub fn extract(table: &Table) -> Vec<Insight> {
    let series: Vec<(&str, Vec<f64>)> = table
        .numeric_columns()
        .iter()
        .map(|c| (c.name.as_str(), c.as_f64_lossy()))
        .collect();

    let mut insights = Vec::new();
    if let Some(i) = correlation_insight(&series) {
        insights.push(i);
    }
    if let Some(i) = variability_insight(&series) {
        insights.push(i);
    }
    if let Some(i) = range_insight(&series) {
        insights.push(i);
    }
    insights
}

/// Strongest absolute off-diagonal Pearson correlation, if it clears the
/// threshold.  Ties keep the first pair in row-major scan order.
fn correlation_insight(series: &[(&str, Vec<f64>)]) -> Option<Insight> {
    if series.len() < 2 {
        return None;
    }

    let mut best: Option<(usize, usize, f64)> = None;
    for i in 0..series.len() {
        for j in (i + 1)..series.len() {
            let Some(r) = pearson(&series[i].1, &series[j].1) else {
                continue;
            };
            if best.map_or(true, |(_, _, b)| r.abs() > b.abs()) {
                best = Some((i, j, r));
            }
        }
    }

    let (i, j, r) = best?;
    if r.abs() <= CORRELATION_THRESHOLD {
        return None;
    }

    let (left, right) = (series[i].0.to_string(), series[j].0.to_string());
    Some(Insight {
        summary: format!(
            "Strong relationship between '{left}' and '{right}' (correlation {r:.2})"
        ),
        evidence: Evidence::Correlation {
            left,
            right,
            coefficient: r,
        },
    })
}

/// The numeric column with the largest sample standard deviation.
/// Ties keep the first column in declared order.
fn variability_insight(series: &[(&str, Vec<f64>)]) -> Option<Insight> {
    let mut best: Option<(&str, f64)> = None;
    for (name, xs) in series {
        let Some(s) = sample_std(xs) else {
            continue;
        };
        if best.map_or(true, |(_, b)| s > b) {
            best = Some((*name, s));
        }
    }
    let (name, std_dev) = best?;

    Some(Insight {
        summary: format!("'{name}' has the widest spread (std dev {std_dev:.2})"),
        evidence: Evidence::Variability {
            column: name.to_string(),
            std_dev,
        },
    })
}

/// Min and max of the first numeric column in declared order.
fn range_insight(series: &[(&str, Vec<f64>)]) -> Option<Insight> {
    let (name, xs) = series.first()?;
    let finite: Vec<f64> = xs.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(Insight {
        summary: format!("'{name}' ranges from {min} to {max}"),
        evidence: Evidence::Range {
            column: name.to_string(),
            min,
            max,
        },
    })
}

// ---------------------------------------------------------------------------
// Directly-computed statistics (shared with the profile report)
// ---------------------------------------------------------------------------

/// Mean of the finite values; `None` when there are none.
pub(crate) fn mean(xs: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = xs.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().sum::<f64>() / finite.len() as f64)
}

/// Sample standard deviation (n−1) of the finite values; needs at least two.
pub(crate) fn sample_std(xs: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = xs.iter().copied().filter(|x| x.is_finite()).collect();
    let n = finite.len();
    if n < 2 {
        return None;
    }
    let m = finite.iter().sum::<f64>() / n as f64;
    let var = finite.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(var.sqrt())
}

/// Pearson correlation over pairwise-complete (both finite) observations.
/// `None` with fewer than two complete pairs or a constant series.
pub(crate) fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return None;
    }

    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in &pairs {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx).powi(2);
        syy += (y - my).powi(2);
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some(sxy / denom)
}
