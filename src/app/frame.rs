use eframe::egui::{self, Context, CursorIcon, Sense, pos2, vec2};

use super::graph::paint_symbols;
use super::input::{InputEvent, KeyCode, translate};
use super::render_utils::draw_background;
use super::scene::{SceneInput, build_scene};
use super::ui::{ButtonAction, paint_controls, paint_info_panel, paint_tooltip, text_offset};
use super::ViewModel;

const FIELD_TEXT_PADDING: f32 = 10.0;

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context) -> Option<usize> {
        let (now, events) = ctx.input(|input| {
            (
                input.time,
                input.events.iter().filter_map(translate).collect::<Vec<_>>(),
            )
        });

        let preset_request = self.handle_events(ctx, &events, now);

        if self.idle.tick(now, &mut self.rng)
            && let Some(axis) = self.scatter.random_switch(&mut self.rng)
        {
            tracing::trace!(axis = axis.label(), "idle axis switch");
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (canvas, _response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
                let painter = ui.painter_at(canvas);

                self.scatter.set_canvas(canvas);
                self.glyphs.measure(&painter, &mut self.scatter);
                self.scatter.advance();
                self.hovered = self.pointer.and_then(|pointer| self.scatter.hit_test(pointer));

                let scene = build_scene(
                    &self.scatter,
                    &self.panel,
                    canvas,
                    SceneInput {
                        selected: self.selection.selected(),
                        hovered: self.hovered,
                        pointer: self.pointer,
                        idle: self.idle.is_idle(now),
                        active_preset: self.active_preset,
                        presets: &self.presets,
                    },
                );

                draw_background(&painter, scene.canvas, scene.drawable);
                paint_symbols(&painter, &scene, &self.glyphs);
                if let Some(elements) = &scene.ui {
                    paint_controls(&painter, elements, &self.ui_font);
                }
                if let Some(info) = &scene.info {
                    paint_info_panel(&painter, scene.canvas, info, &self.ui_font);
                }
                if let Some(tooltip) = &scene.tooltip {
                    paint_tooltip(&painter, scene.canvas, tooltip);
                }

                self.publish_text_input(ctx, &painter);
            });

        ctx.request_repaint();
        preset_request
    }

    /// Two passes over the batch: activity first so the idle clock is fresh
    /// even for events a widget consumes, then dispatch in arrival order.
    fn handle_events(&mut self, ctx: &Context, events: &[InputEvent], now: f64) -> Option<usize> {
        if events.iter().any(InputEvent::is_user_activity) {
            self.idle.note_interaction(now);
        }

        let mut preset_request = None;
        for event in events {
            match event {
                InputEvent::Key {
                    key: KeyCode::Escape,
                    pressed: true,
                } => {
                    tracing::info!("escape pressed, closing");
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    continue;
                }
                InputEvent::PointerMoved(pos) => self.pointer = Some(*pos),
                InputEvent::PointerLeft => self.pointer = None,
                _ => {}
            }

            let response = self.panel.handle(event, now);
            match response.action {
                Some(ButtonAction::CycleAxis(axis)) => {
                    self.scatter.cycle_axis(axis);
                }
                Some(ButtonAction::SelectPreset(preset)) => {
                    if preset != self.active_preset {
                        preset_request = Some(preset);
                    }
                }
                None => {}
            }
            if response.consumed {
                continue;
            }

            if let InputEvent::PointerButton {
                pos,
                primary: true,
                pressed: true,
            } = event
            {
                self.selection.click(self.scatter.hit_test(*pos));
            }
        }

        preset_request
    }

    fn publish_text_input(&self, ctx: &Context, painter: &egui::Painter) {
        let Some(field) = self.panel.text_field() else {
            return;
        };
        if field.hovered {
            ctx.set_cursor_icon(CursorIcon::Text);
        }

        let text = self.panel.text();
        if !text.is_focused() {
            return;
        }

        let display = text.display_text();
        let caret_x = (field.rect.left()
            + FIELD_TEXT_PADDING
            + text_offset(painter, &display, text.caret(), &self.ui_font))
        .min(field.rect.right() - FIELD_TEXT_PADDING);
        let cursor_rect = egui::Rect::from_min_size(
            pos2(caret_x, field.rect.top() + 5.0),
            vec2(1.0, field.rect.height() - 10.0),
        );

        ctx.output_mut(|output| {
            output.ime = Some(egui::output::IMEOutput {
                rect: field.rect,
                cursor_rect,
            });
        });
    }
}
