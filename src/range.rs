use crate::models::{ChartPoint, VisibleRange};

const PADDING_RATIO: f64 = 0.1;

/// Y-axis domain covering every non-null rate of the selected variations.
///
/// Falls back to `0..100` when there is nothing to show. The lower bound is
/// never negative.
pub fn visible_range(points: &[ChartPoint], selected: &[String]) -> VisibleRange {
    if points.is_empty() || selected.is_empty() {
        return VisibleRange::default();
    }

    let values: Vec<f64> = points
        .iter()
        .flat_map(|point| selected.iter().filter_map(move |id| point.value(id)))
        .collect();

    if values.is_empty() {
        return VisibleRange::default();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let padding = (max - min) * PADDING_RATIO;

    VisibleRange {
        min: (min - padding).max(0.0),
        max: max + padding,
    }
}
