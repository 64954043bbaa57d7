use crate::model::{AggregatedRow, FitLine};
use anyhow::Context;
use plotters::prelude::*;
use std::ops::Range;

const LATENCY_COLOUR: RGBColor = RGBColor(0xAA, 0x00, 0x00);
const FIT_COLOUR: RGBColor = RGBColor(0x88, 0x88, 0x88);
const SIZE_COLOUR: RGBColor = RGBColor(0x00, 0x00, 0xFF);

/// Write the static chart snapshot as a PNG, overwriting `path`.
///
/// Primary y-axis: observed latency plus the fitted line. Secondary y-axis:
/// message size, drawn without its own gridlines.
pub fn write_png_chart(path: &str, rows: &[AggregatedRow], fit: &FitLine) -> anyhow::Result<()> {
    let (x_range, y_range, y2_range) = axis_ranges(rows, fit);

    let root = BitMapBackend::new(path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Latency and Size vs. Object Count", ("sans-serif", 32))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .set_label_area_size(LabelAreaPosition::Right, 70)
        .build_cartesian_2d(x_range.clone(), y_range)?
        .set_secondary_coord(x_range, y2_range);

    chart
        .configure_mesh()
        .x_desc("Object Count")
        .y_desc("Latency (ms)")
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc("Size (KB)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            rows.iter().map(|r| (r.object_count as f64, r.latency_ms)),
            LATENCY_COLOUR.stroke_width(2),
        ))?
        .label("Latency (ms)")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], LATENCY_COLOUR.stroke_width(2))
        });

    chart
        .draw_series(LineSeries::new(
            rows.iter()
                .map(|r| (r.object_count as f64, fit.y(r.object_count as f64))),
            FIT_COLOUR.stroke_width(2),
        ))?
        .label(fit.label())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FIT_COLOUR.stroke_width(2)));

    chart
        .draw_secondary_series(LineSeries::new(
            rows.iter().map(|r| (r.object_count as f64, r.size_kb)),
            SIZE_COLOUR.stroke_width(2),
        ))?
        .label("Size (KB)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], SIZE_COLOUR.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperMiddle)
        .background_style(WHITE.filled())
        .border_style(BLACK.stroke_width(1))
        .draw()?;

    root.present()
        .with_context(|| format!("write chart image {}", path))?;
    Ok(())
}

/// Axis ranges for the chart: x spans the observed object counts, both
/// y-axes span zero to the series maximum with 5% headroom. The fitted line
/// is evaluated at the observed endpoints so it never leaves the frame.
fn axis_ranges(
    rows: &[AggregatedRow],
    fit: &FitLine,
) -> (Range<f64>, Range<f64>, Range<f64>) {
    // Rows arrive sorted ascending by object count.
    let x_min = rows.first().map(|r| r.object_count as f64).unwrap_or(0.0);
    let x_max = rows.last().map(|r| r.object_count as f64).unwrap_or(1.0);

    let mut y_max = 0.0f64;
    let mut y2_max = 0.0f64;
    for r in rows {
        let x = r.object_count as f64;
        y_max = y_max.max(r.latency_ms).max(fit.y(x));
        y2_max = y2_max.max(r.size_kb);
    }
    if y_max <= 0.0 {
        y_max = 1.0;
    }
    if y2_max <= 0.0 {
        y2_max = 1.0;
    }

    (x_min..x_max, 0.0..y_max * 1.05, 0.0..y2_max * 1.05)
}
