mod text_field;

pub(crate) use text_field::{TextInputState, TextInputStateMachine};

use eframe::egui::{self, ImeEvent, Pos2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyCode {
    Backspace,
    Enter,
    Escape,
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum InputEvent {
    PointerMoved(Pos2),
    PointerButton {
        pos: Pos2,
        primary: bool,
        pressed: bool,
    },
    PointerLeft,
    Key {
        key: KeyCode,
        pressed: bool,
    },
    TextCommit(String),
    Composition {
        text: String,
        cursor_start: usize,
        cursor_len: usize,
    },
}

impl InputEvent {
    pub(crate) fn is_user_activity(&self) -> bool {
        match self {
            Self::PointerMoved(_) | Self::PointerButton { .. } => true,
            Self::Key { pressed, .. } => *pressed,
            Self::PointerLeft | Self::TextCommit(_) | Self::Composition { .. } => false,
        }
    }
}

pub(crate) fn translate(event: &egui::Event) -> Option<InputEvent> {
    match event {
        egui::Event::PointerMoved(pos) => Some(InputEvent::PointerMoved(*pos)),
        egui::Event::PointerButton {
            pos,
            button,
            pressed,
            ..
        } => Some(InputEvent::PointerButton {
            pos: *pos,
            primary: *button == egui::PointerButton::Primary,
            pressed: *pressed,
        }),
        egui::Event::PointerGone | egui::Event::WindowFocused(false) => Some(InputEvent::PointerLeft),
        egui::Event::Key { key, pressed, .. } => Some(InputEvent::Key {
            key: match key {
                egui::Key::Backspace => KeyCode::Backspace,
                egui::Key::Enter => KeyCode::Enter,
                egui::Key::Escape => KeyCode::Escape,
                _ => KeyCode::Other,
            },
            pressed: *pressed,
        }),
        egui::Event::Text(text) => Some(InputEvent::TextCommit(text.clone())),
        egui::Event::Ime(ImeEvent::Commit(text)) => Some(InputEvent::TextCommit(text.clone())),
        egui::Event::Ime(ImeEvent::Preedit(text)) => Some(InputEvent::Composition {
            text: text.clone(),
            cursor_start: text.chars().count(),
            cursor_len: 0,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn ime_events_map_to_commit_and_composition() {
        let commit = egui::Event::Ime(ImeEvent::Commit("猫".to_string()));
        assert_eq!(translate(&commit), Some(InputEvent::TextCommit("猫".to_string())));

        let preedit = egui::Event::Ime(ImeEvent::Preedit("ねこ".to_string()));
        assert_eq!(
            translate(&preedit),
            Some(InputEvent::Composition {
                text: "ねこ".to_string(),
                cursor_start: 2,
                cursor_len: 0,
            })
        );
    }

    #[test]
    fn focus_loss_maps_to_pointer_left() {
        assert_eq!(
            translate(&egui::Event::WindowFocused(false)),
            Some(InputEvent::PointerLeft)
        );
        assert_eq!(translate(&egui::Event::WindowFocused(true)), None);
    }

    #[test]
    fn activity_covers_pointer_and_key_presses_only() {
        assert!(InputEvent::PointerMoved(pos2(1.0, 2.0)).is_user_activity());
        assert!(
            InputEvent::Key {
                key: KeyCode::Other,
                pressed: true
            }
            .is_user_activity()
        );
        assert!(
            !InputEvent::Key {
                key: KeyCode::Other,
                pressed: false
            }
            .is_user_activity()
        );
        assert!(!InputEvent::TextCommit("a".to_string()).is_user_activity());
    }
}
