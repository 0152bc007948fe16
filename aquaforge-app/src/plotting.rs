//! Bar chart of one prediction, drawn with `plotters`.

use anyhow::Result;
use aquaforge_schemas::target::{PredictionResult, Target};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Writes the chart for `result` to a PNG file.
pub fn bar_chart_png(result: &PredictionResult, path: &Path, dims: (u32, u32)) -> Result<()> {
    let root = BitMapBackend::new(path, dims).into_drawing_area();
    draw_bars(&root, result)?;
    root.present()?;
    Ok(())
}

/// Renders the chart for `result` as an SVG document.
pub fn bar_chart_svg(result: &PredictionResult, dims: (u32, u32)) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, dims).into_drawing_area();
        draw_bars(&root, result)?;
        root.present()?;
    }
    Ok(svg)
}

/// One bar per target, in target order, labelled with its value.
fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    result: &PredictionResult,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (y_min, y_max) = value_range(&result.values);
    let mut chart = ChartBuilder::on(root)
        .caption("Predicted Pollutant Levels", ("sans-serif", 28).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..Target::COUNT as u32).into_segmented(), y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(Target::COUNT)
        .x_label_formatter(&|v| segment_label(v))
        .y_desc("mg/L")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(RGBColor(0, 119, 182).filled())
            .margin(20)
            .data(result.values.iter().enumerate().map(|(i, v)| (i as u32, *v))),
    )?;

    chart.draw_series(result.values.iter().enumerate().map(|(i, v)| {
        Text::new(
            format!("{:.2}", v),
            (SegmentValue::CenterOf(i as u32), *v),
            ("sans-serif", 16).into_font(),
        )
    }))?;

    Ok(())
}

fn segment_label(value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(i) => Target::ALL
            .get(*i as usize)
            .map(|t| t.label().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Y axis range covering zero and every value, with headroom for the labels.
fn value_range(values: &[f64]) -> (f64, f64) {
    let max = values.iter().copied().fold(0.0, f64::max);
    let min = values.iter().copied().fold(0.0, f64::min);
    if max == min {
        return (0.0, 1.0);
    }
    let pad = (max - min) * 0.1;
    let low = if min < 0.0 { min - pad } else { 0.0 };
    (low, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_starts_at_zero_for_positive_values() {
        assert_eq!(value_range(&[2.0, 10.0, 5.0]), (0.0, 11.0));
    }

    #[test]
    fn range_extends_below_zero_for_negative_values() {
        assert_eq!(value_range(&[-10.0, 10.0, 0.0]), (-12.0, 12.0));
    }

    #[test]
    fn range_for_all_zero_is_non_empty() {
        assert_eq!(value_range(&[0.0, 0.0, 0.0]), (0.0, 1.0));
    }

    #[test]
    fn segments_are_labelled_in_target_order() {
        let labels: Vec<String> = (0..3)
            .map(|i| segment_label(&SegmentValue::CenterOf(i)))
            .collect();
        assert_eq!(labels, ["O₂ (mg/L)", "BSK5 (mg/L)", "Suspended Solids (mg/L)"]);
        assert_eq!(segment_label(&SegmentValue::Last), "");
    }
}
