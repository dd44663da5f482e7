use eframe::egui::{Pos2, Rect, pos2, vec2};

use crate::dataset::{MetricStore, SymbolMetrics};

use super::axes::AxisSelection;

/// Canvas minus a `margin` reserved on all four sides. Collapses onto the
/// canvas center instead of inverting when the canvas is too small.
pub(super) fn drawable_area(canvas: Rect, margin: f32) -> Rect {
    let inset_x = margin.min(canvas.width() * 0.5).max(0.0);
    let inset_y = margin.min(canvas.height() * 0.5).max(0.0);
    Rect::from_min_max(
        canvas.min + vec2(inset_x, inset_y),
        canvas.max - vec2(inset_x, inset_y),
    )
}

/// Screen target for `symbol` under `axes`. Both metrics are normalized
/// against their recorded range and clamped to `[0, 1]`; Y is flipped so
/// larger values sit higher on screen.
pub(super) fn compute_target(
    symbol: &SymbolMetrics,
    axes: AxisSelection,
    store: &MetricStore,
    area: Rect,
) -> Pos2 {
    let nx = store.range(axes.x()).normalize(symbol.value(axes.x())) as f32;
    let ny = store.range(axes.y()).normalize(symbol.value(axes.y())) as f32;
    let ny = 1.0 - ny;

    area.clamp(pos2(
        area.min.x + nx * area.width(),
        area.min.y + ny * area.height(),
    ))
}
