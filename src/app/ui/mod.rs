mod controls;
mod panels;

use eframe::egui::{Pos2, Rect, pos2, vec2};

use crate::config::Settings;

use super::axes::Axis;
use super::input::{InputEvent, KeyCode, TextInputStateMachine};

pub(in crate::app) use controls::{paint_controls, text_offset};
pub(in crate::app) use panels::{paint_info_panel, paint_tooltip};

const PANEL_ORIGIN: Pos2 = pos2(30.0, 30.0);
const BUTTON_WIDTH: f32 = 300.0;
const BUTTON_HEIGHT: f32 = 40.0;
const SECTION_GAP: f32 = 10.0;
const PRESET_COLUMNS: usize = 2;
const PRESET_ROW_HEIGHT: f32 = 35.0;
const PRESET_ROW_GAP: f32 = 5.0;
const CLEAR_INSET: f32 = 5.0;

pub(crate) const SEARCH_PLACEHOLDER: &str = "Type to filter...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ButtonAction {
    CycleAxis(Axis),
    SelectPreset(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ButtonElement {
    pub(crate) rect: Rect,
    pub(crate) action: usize,
    pub(crate) hovered: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TextFieldElement {
    pub(crate) rect: Rect,
    pub(crate) clear_rect: Rect,
    pub(crate) hovered: bool,
    pub(crate) clear_hovered: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum UiElement {
    Button(ButtonElement),
    TextField(TextFieldElement),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PanelResponse {
    pub(crate) consumed: bool,
    pub(crate) action: Option<ButtonAction>,
}

impl PanelResponse {
    fn consumed() -> Self {
        Self {
            consumed: true,
            action: None,
        }
    }
}

pub(crate) struct ControlPanel {
    elements: Vec<UiElement>,
    actions: Vec<ButtonAction>,
    text: TextInputStateMachine,
}

impl ControlPanel {
    pub(crate) fn new(preset_count: usize, settings: &Settings) -> Self {
        let mut panel = Self {
            elements: Vec::new(),
            actions: Vec::new(),
            text: TextInputStateMachine::new(settings),
        };

        let mut y = PANEL_ORIGIN.y;
        for axis in [Axis::X, Axis::Y] {
            panel.push_button(
                Rect::from_min_size(pos2(PANEL_ORIGIN.x, y), vec2(BUTTON_WIDTH, BUTTON_HEIGHT)),
                ButtonAction::CycleAxis(axis),
            );
            y += BUTTON_HEIGHT;
        }

        y += SECTION_GAP;
        let field = Rect::from_min_size(pos2(PANEL_ORIGIN.x, y), vec2(BUTTON_WIDTH, BUTTON_HEIGHT));
        let clear_size = BUTTON_HEIGHT - 2.0 * CLEAR_INSET;
        panel.elements.push(UiElement::TextField(TextFieldElement {
            rect: field,
            clear_rect: Rect::from_min_size(
                pos2(field.right() - clear_size - CLEAR_INSET, field.top() + CLEAR_INSET),
                vec2(clear_size, clear_size),
            ),
            hovered: false,
            clear_hovered: false,
        }));
        y += BUTTON_HEIGHT + SECTION_GAP;

        let column_width = (BUTTON_WIDTH - SECTION_GAP) / PRESET_COLUMNS as f32;
        for preset in 0..preset_count {
            let row = (preset / PRESET_COLUMNS) as f32;
            let column = (preset % PRESET_COLUMNS) as f32;
            panel.push_button(
                Rect::from_min_size(
                    pos2(
                        PANEL_ORIGIN.x + column * (column_width + SECTION_GAP),
                        y + row * (PRESET_ROW_HEIGHT + PRESET_ROW_GAP),
                    ),
                    vec2(column_width, PRESET_ROW_HEIGHT),
                ),
                ButtonAction::SelectPreset(preset),
            );
        }

        panel
    }

    fn push_button(&mut self, rect: Rect, action: ButtonAction) {
        self.elements.push(UiElement::Button(ButtonElement {
            rect,
            action: self.actions.len(),
            hovered: false,
        }));
        self.actions.push(action);
    }

    pub(crate) fn elements(&self) -> &[UiElement] {
        &self.elements
    }

    pub(crate) fn action(&self, index: usize) -> Option<ButtonAction> {
        self.actions.get(index).copied()
    }

    pub(crate) fn text(&self) -> &TextInputStateMachine {
        &self.text
    }

    pub(crate) fn text_field(&self) -> Option<&TextFieldElement> {
        self.elements.iter().find_map(|element| match element {
            UiElement::TextField(field) => Some(field),
            UiElement::Button(_) => None,
        })
    }

    pub(crate) fn handle(&mut self, event: &InputEvent, now: f64) -> PanelResponse {
        let mut response = PanelResponse::default();
        let has_text = self.text.has_text();

        for element in &mut self.elements {
            match (element, event) {
                (UiElement::Button(button), InputEvent::PointerMoved(pos)) => {
                    button.hovered = button.rect.contains(*pos);
                }
                (UiElement::TextField(field), InputEvent::PointerMoved(pos)) => {
                    field.hovered = field.rect.contains(*pos);
                    field.clear_hovered = field.clear_rect.contains(*pos);
                }
                (UiElement::Button(button), InputEvent::PointerLeft) => button.hovered = false,
                (UiElement::TextField(field), InputEvent::PointerLeft) => {
                    field.hovered = false;
                    field.clear_hovered = false;
                }
                (
                    UiElement::Button(button),
                    InputEvent::PointerButton {
                        pos,
                        primary: true,
                        pressed: true,
                    },
                ) => {
                    if button.rect.contains(*pos) {
                        response.consumed = true;
                        response.action = self.actions.get(button.action).copied();
                    }
                }
                (
                    UiElement::TextField(field),
                    InputEvent::PointerButton {
                        pos,
                        primary: true,
                        pressed: true,
                    },
                ) => {
                    if has_text && field.clear_rect.contains(*pos) {
                        self.text.clear();
                        response.consumed = true;
                    } else if field.rect.contains(*pos) {
                        self.text.focus_gain();
                        response.consumed = true;
                    } else if self.text.is_focused() {
                        self.text.focus_loss();
                    }
                }
                _ => {}
            }
        }

        if response.consumed || !self.text.is_focused() {
            return response;
        }

        match event {
            InputEvent::Key {
                key: KeyCode::Backspace,
                pressed: true,
            } => {
                self.text.backspace();
                PanelResponse::consumed()
            }
            InputEvent::Key {
                key: KeyCode::Enter,
                pressed: true,
            } => {
                self.text.confirm();
                PanelResponse::consumed()
            }
            InputEvent::TextCommit(fragment) => {
                let outcome = self.text.commit(fragment, now);
                tracing::trace!(?outcome, fragment = fragment.as_str(), "text commit");
                PanelResponse::consumed()
            }
            InputEvent::Composition {
                text,
                cursor_start,
                cursor_len,
            } => {
                let outcome = self
                    .text
                    .composition_update(text, *cursor_start, *cursor_len, now);
                tracing::trace!(?outcome, text = text.as_str(), "composition update");
                PanelResponse::consumed()
            }
            _ => response,
        }
    }
}
