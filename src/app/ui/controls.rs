use eframe::egui::{Align2, Color32, FontId, Painter, Rect, Stroke, StrokeKind, pos2, vec2};

use super::super::render_utils::{ACCENT, MUTED_TEXT, UI_BORDER, UI_TEXT};
use super::super::scene::{ElementView, TextFieldView};

const CORNER_RADIUS: f32 = 6.0;
const TEXT_PADDING: f32 = 10.0;
const UNDERLINE_INSET: f32 = 8.0;

const ACTIVE_FILL: Color32 = Color32::from_rgb(200, 220, 255);
const ACTIVE_TEXT: Color32 = Color32::from_rgb(0, 0, 100);
const HOVER_FILL: Color32 = Color32::from_rgb(230, 230, 230);
const BUTTON_FILL: Color32 = Color32::from_rgb(250, 250, 250);
const FIELD_FILL: Color32 = Color32::from_rgb(255, 255, 255);
const SELECTION_FILL: Color32 = Color32::from_rgba_premultiplied(24, 47, 71, 100);
const CLEAR_HOVER_FILL: Color32 = Color32::from_rgb(230, 230, 230);
const CLEAR_HOVER_TEXT: Color32 = Color32::from_rgb(100, 100, 100);

pub(in crate::app) fn paint_controls(painter: &Painter, elements: &[ElementView], font: &FontId) {
    for element in elements {
        match element {
            ElementView::Button {
                rect,
                label,
                hovered,
                active,
            } => paint_button(painter, *rect, label, *hovered, *active, font),
            ElementView::TextField(field) => paint_text_field(painter, field, font),
        }
    }
}

fn paint_button(painter: &Painter, rect: Rect, label: &str, hovered: bool, active: bool, font: &FontId) {
    let (fill, border, text, width) = if active {
        (ACTIVE_FILL, ACCENT, ACTIVE_TEXT, 2.0)
    } else if hovered {
        (HOVER_FILL, ACCENT, UI_TEXT, 1.0)
    } else {
        (BUTTON_FILL, UI_BORDER, UI_TEXT, 1.0)
    };

    painter.rect_filled(rect, CORNER_RADIUS, fill);
    painter.rect_stroke(rect, CORNER_RADIUS, Stroke::new(width, border), StrokeKind::Inside);
    painter.text(rect.center(), Align2::CENTER_CENTER, label, font.clone(), text);
}

pub(in crate::app) fn text_offset(painter: &Painter, text: &str, chars: usize, font: &FontId) -> f32 {
    let prefix = text.chars().take(chars).collect::<String>();
    if prefix.is_empty() {
        return 0.0;
    }
    painter.layout_no_wrap(prefix, font.clone(), UI_TEXT).size().x
}

fn paint_text_field(painter: &Painter, field: &TextFieldView, font: &FontId) {
    let rect = field.rect;
    let (border, width) = if field.focused {
        (ACCENT, 2.0)
    } else {
        (UI_BORDER, 1.0)
    };
    painter.rect_filled(rect, CORNER_RADIUS, FIELD_FILL);
    painter.rect_stroke(rect, CORNER_RADIUS, Stroke::new(width, border), StrokeKind::Inside);

    let color = if field.placeholder { MUTED_TEXT } else { UI_TEXT };
    let galley = painter.layout_no_wrap(field.text.clone(), font.clone(), color);
    let visible_width = rect.width() - 2.0 * TEXT_PADDING;
    // Long text keeps its tail visible.
    let scroll = (galley.size().x - visible_width).max(0.0);
    let origin = pos2(
        rect.left() + TEXT_PADDING - scroll,
        rect.center().y - galley.size().y * 0.5,
    );
    let clip = painter.with_clip_rect(rect.shrink2(vec2(TEXT_PADDING, 0.0)));

    if field.replace_highlight {
        let highlight = Rect::from_min_size(origin, galley.size()).intersect(clip.clip_rect());
        clip.rect_filled(highlight, 0.0, SELECTION_FILL);
    }
    clip.galley(origin, galley, color);

    if let Some(span) = &field.underline {
        let start = origin.x + text_offset(painter, &field.text, span.start, font);
        let end = (origin.x + text_offset(painter, &field.text, span.end, font))
            .min(rect.right() - TEXT_PADDING);
        if start < rect.right() {
            let y = rect.bottom() - UNDERLINE_INSET;
            clip.line_segment([pos2(start, y), pos2(end, y)], Stroke::new(2.0, ACCENT));
        }
    }

    if field.show_clear {
        let text = if field.clear_hovered {
            painter.circle_filled(
                field.clear_rect.center(),
                field.clear_rect.width() * 0.5,
                CLEAR_HOVER_FILL,
            );
            CLEAR_HOVER_TEXT
        } else {
            MUTED_TEXT
        };
        painter.text(
            field.clear_rect.center(),
            Align2::CENTER_CENTER,
            "×",
            font.clone(),
            text,
        );
    }
}
