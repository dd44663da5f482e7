use eframe::egui::{Color32, Painter, Rect, Stroke};

use crate::dataset::MetricStore;

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(255, 255, 255);
pub(super) const AXIS: Color32 = Color32::from_rgb(200, 200, 200);
pub(super) const ACCENT: Color32 = Color32::from_rgb(60, 120, 180);
pub(super) const UI_BORDER: Color32 = Color32::from_rgb(220, 220, 220);
pub(super) const UI_TEXT: Color32 = Color32::from_rgb(20, 20, 20);
pub(super) const MUTED_TEXT: Color32 = Color32::from_rgb(150, 150, 150);
pub(super) const RELATED: Color32 = Color32::from_rgb(80, 80, 255);
pub(super) const LINK: Color32 = Color32::from_rgb(100, 100, 255);
pub(super) const SEARCH_GLOW: Color32 = Color32::from_rgba_premultiplied(39, 39, 100, 100);
pub(super) const SEARCH_BORDER: Color32 = Color32::from_rgb(50, 50, 255);
pub(super) const PANEL_FILL: Color32 = Color32::from_rgba_premultiplied(231, 231, 231, 240);
pub(super) const TOOLTIP_FILL: Color32 = Color32::from_rgba_premultiplied(230, 230, 230, 230);
pub(super) const TOOLTIP_BORDER: Color32 = Color32::from_rgb(180, 180, 180);
pub(super) const SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 30);

const FALLBACK_CHANNEL: u8 = 128;

pub(super) fn symbol_color(store: &MetricStore, index: usize) -> Color32 {
    let symbol = &store.symbols()[index];
    let channel = |name: &str| {
        store
            .find_key(name)
            .map(|key| (symbol.value(key) * 150.0 + 80.0).clamp(0.0, 255.0) as u8)
            .unwrap_or(FALLBACK_CHANNEL)
    };

    Color32::from_rgb(
        channel("horizontal_ratio"),
        channel("vertical_ratio"),
        channel("diagonal_ratio"),
    )
}

pub(super) fn draw_background(painter: &Painter, canvas: Rect, drawable: Rect) {
    painter.rect_filled(canvas, 0.0, BACKGROUND);

    let stroke = Stroke::new(1.0, AXIS);
    painter.line_segment([drawable.left_bottom(), drawable.right_bottom()], stroke);
    painter.line_segment([drawable.left_top(), drawable.left_bottom()], stroke);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample_store;

    #[test]
    fn missing_ratio_keys_fall_back_to_gray() {
        let store = sample_store();
        assert_eq!(symbol_color(&store, 0), Color32::from_rgb(128, 128, 128));
    }
}
