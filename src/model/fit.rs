//! First-degree least-squares fit of latency against object count.

use crate::model::AggregatedRow;
use anyhow::bail;
use serde::Serialize;

/// Coefficients of the fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitLine {
    pub slope: f64,
    pub intercept: f64,
}

impl FitLine {
    pub fn y(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Legend label carrying both coefficients, e.g.
    /// "Line of Best Fit (y = 0.04217x + 1.73205)".
    pub fn label(&self) -> String {
        format!(
            "Line of Best Fit (y = {:.5}x + {:.5})",
            self.slope, self.intercept
        )
    }
}

/// Ordinary least squares over the aggregated table.
///
/// The table holds one row per distinct object count, so two rows are
/// enough to determine the line; fewer is a degenerate fit and an explicit
/// error rather than NaN coefficients. An empty table (no log files, or no
/// records with a latency) fails here too.
pub fn fit_latency(rows: &[AggregatedRow]) -> anyhow::Result<FitLine> {
    if rows.len() < 2 {
        bail!(
            "line fit needs at least two distinct object counts, got {}",
            rows.len()
        );
    }

    let n = rows.len() as f64;
    let mean_x = rows.iter().map(|r| r.object_count as f64).sum::<f64>() / n;
    let mean_y = rows.iter().map(|r| r.latency_ms).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for r in rows {
        let dx = r.object_count as f64 - mean_x;
        sxx += dx * dx;
        sxy += dx * (r.latency_ms - mean_y);
    }

    // sxx > 0 because object counts in the table are distinct.
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    Ok(FitLine { slope, intercept })
}
