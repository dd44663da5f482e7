use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, StrokeKind, Vec2, pos2, vec2};

use super::super::render_utils::{
    ACCENT, PANEL_FILL, SHADOW, TOOLTIP_BORDER, TOOLTIP_FILL, UI_BORDER, UI_TEXT,
};
use super::super::scene::{INFO_PANEL_WIDTH, InfoPanel, Tooltip};

const HEADER_SIZE: f32 = 48.0;
const PANEL_PADDING: f32 = 30.0;
const LABEL_COLOR: Color32 = Color32::from_rgb(100, 100, 100);
const TOOLTIP_TEXT: Color32 = Color32::from_rgb(80, 80, 80);
const TOOLTIP_PADDING: f32 = 10.0;
const TOOLTIP_OFFSET: Vec2 = vec2(15.0, -40.0);

pub(in crate::app) fn paint_info_panel(painter: &Painter, canvas: Rect, info: &InfoPanel<'_>, font: &FontId) {
    let panel = Rect::from_min_max(pos2(canvas.right() - INFO_PANEL_WIDTH, canvas.top()), canvas.max);
    painter.rect_filled(panel, 0.0, PANEL_FILL);
    painter.line_segment([panel.left_top(), panel.left_bottom()], Stroke::new(1.0, UI_BORDER));

    let x = panel.left() + PANEL_PADDING;
    let mut y = panel.top() + 50.0;
    painter.text(
        pos2(x, y),
        Align2::LEFT_TOP,
        info.glyph,
        FontId::proportional(HEADER_SIZE),
        ACCENT,
    );
    y += 80.0;

    for (label, value) in &info.rows {
        painter.text(pos2(x, y), Align2::LEFT_TOP, *label, font.clone(), LABEL_COLOR);
        y += 20.0;
        painter.text(pos2(x, y), Align2::LEFT_TOP, format!("{value:.4}"), font.clone(), UI_TEXT);
        y += 30.0;
        painter.line_segment(
            [pos2(x, y - 5.0), pos2(panel.right() - PANEL_PADDING, y - 5.0)],
            Stroke::new(1.0, UI_BORDER),
        );
        y += 10.0;
    }
}

pub(in crate::app) fn paint_tooltip(painter: &Painter, canvas: Rect, tooltip: &Tooltip<'_>) {
    let galley = painter.layout_no_wrap(
        tooltip.glyph.to_string(),
        FontId::proportional(HEADER_SIZE),
        TOOLTIP_TEXT,
    );
    let size = galley.size() + vec2(TOOLTIP_PADDING, TOOLTIP_PADDING) * 2.0;
    let background = Rect::from_min_size(tooltip_origin(canvas, tooltip.pointer, size), size);

    painter.rect_filled(background.translate(vec2(2.0, 2.0)), 4.0, SHADOW);
    painter.rect_filled(background, 4.0, TOOLTIP_FILL);
    painter.rect_stroke(background, 4.0, Stroke::new(1.0, TOOLTIP_BORDER), StrokeKind::Inside);
    painter.galley(
        background.min + vec2(TOOLTIP_PADDING, TOOLTIP_PADDING),
        galley,
        TOOLTIP_TEXT,
    );
}

fn tooltip_origin(canvas: Rect, pointer: Pos2, size: Vec2) -> Pos2 {
    let mut origin = pointer + TOOLTIP_OFFSET;
    if origin.x + size.x > canvas.right() {
        origin.x = canvas.right() - 10.0 - size.x;
    }
    if origin.y < canvas.top() {
        origin.y = canvas.top() + 10.0;
    }
    origin
}
