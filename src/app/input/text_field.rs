use std::ops::Range;

use crate::config::Settings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TextInputState {
    Unfocused,
    FocusedIdle,
    FocusedReplaceAll,
    FocusedComposing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CommitOutcome {
    Appended,
    Replaced,
    Duplicate,
    ControlIgnored,
    Unfocused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CompositionOutcome {
    Updated,
    GhostSuppressed,
    Unfocused,
}

#[derive(Clone, Debug)]
struct CommitRecord {
    fragment: String,
    at_secs: f64,
}

/// Search field text: committed text plus the in-flight input-method
/// composition, with de-duplication of the repeated commits and stale
/// composition echoes some input pipelines emit.
///
/// Composition text is cleared whenever a commit is accepted. It survives
/// focus loss.
#[derive(Clone, Debug)]
pub(crate) struct TextInputStateMachine {
    committed: String,
    composition: String,
    composition_cursor: (usize, usize),
    focused: bool,
    replace_all: bool,
    last_commit: Option<CommitRecord>,
    duplicate_window_secs: f64,
    ghost_window_secs: f64,
}

impl TextInputStateMachine {
    pub(crate) fn new(settings: &Settings) -> Self {
        Self {
            committed: String::new(),
            composition: String::new(),
            composition_cursor: (0, 0),
            focused: false,
            replace_all: false,
            last_commit: None,
            duplicate_window_secs: settings.duplicate_commit_secs,
            ghost_window_secs: settings.ghost_composition_secs,
        }
    }

    pub(crate) fn state(&self) -> TextInputState {
        if !self.focused {
            TextInputState::Unfocused
        } else if self.replace_all {
            TextInputState::FocusedReplaceAll
        } else if !self.composition.is_empty() {
            TextInputState::FocusedComposing
        } else {
            TextInputState::FocusedIdle
        }
    }

    pub(crate) fn is_focused(&self) -> bool {
        self.focused
    }

    #[cfg(test)]
    pub(crate) fn replace_all(&self) -> bool {
        self.replace_all
    }

    pub(crate) fn committed(&self) -> &str {
        &self.committed
    }

    #[cfg(test)]
    pub(crate) fn composition(&self) -> &str {
        &self.composition
    }

    pub(crate) fn display_text(&self) -> String {
        format!("{}{}", self.committed, self.composition)
    }

    pub(crate) fn has_text(&self) -> bool {
        !self.committed.is_empty() || !self.composition.is_empty()
    }

    /// Char range of the composition inside [`Self::display_text`], for the
    /// underline. Only reported while focused.
    pub(crate) fn composition_span(&self) -> Option<Range<usize>> {
        if !self.focused || self.composition.is_empty() {
            return None;
        }
        let start = self.committed.chars().count();
        Some(start..start + self.composition.chars().count())
    }

    pub(crate) fn caret(&self) -> usize {
        let committed = self.committed.chars().count();
        if self.composition.is_empty() {
            return committed;
        }
        committed + self.composition_cursor.0.min(self.composition.chars().count())
    }

    /// Click inside the field. Existing text is kept but marked so the next
    /// input replaces it wholesale.
    pub(crate) fn focus_gain(&mut self) {
        self.focused = true;
        self.replace_all = true;
    }

    pub(crate) fn focus_loss(&mut self) {
        self.focused = false;
        self.replace_all = false;
    }

    pub(crate) fn clear(&mut self) {
        self.committed.clear();
        self.composition.clear();
        self.composition_cursor = (0, 0);
        self.focused = true;
        self.replace_all = false;
    }

    pub(crate) fn commit(&mut self, fragment: &str, now: f64) -> CommitOutcome {
        if !self.focused {
            return CommitOutcome::Unfocused;
        }
        if is_control_only(fragment) {
            return CommitOutcome::ControlIgnored;
        }

        let outcome = if self.replace_all {
            self.replace_all = false;
            self.committed.clear();
            CommitOutcome::Replaced
        } else if self.is_recent_commit(fragment, now, self.duplicate_window_secs) {
            return CommitOutcome::Duplicate;
        } else {
            CommitOutcome::Appended
        };

        self.committed.push_str(fragment);
        self.composition.clear();
        self.composition_cursor = (0, 0);
        self.last_commit = Some(CommitRecord {
            fragment: fragment.to_string(),
            at_secs: now,
        });
        outcome
    }

    pub(crate) fn composition_update(
        &mut self,
        text: &str,
        cursor_start: usize,
        cursor_len: usize,
        now: f64,
    ) -> CompositionOutcome {
        if !self.focused {
            return CompositionOutcome::Unfocused;
        }
        if self.replace_all {
            self.replace_all = false;
            self.committed.clear();
        }

        if !text.is_empty() && self.is_recent_commit(text, now, self.ghost_window_secs) {
            self.composition.clear();
            self.composition_cursor = (0, 0);
            return CompositionOutcome::GhostSuppressed;
        }

        self.composition.clear();
        self.composition.push_str(text);
        self.composition_cursor = (cursor_start, cursor_len);
        CompositionOutcome::Updated
    }

    pub(crate) fn backspace(&mut self) {
        if !self.focused {
            return;
        }
        if self.replace_all {
            self.replace_all = false;
            self.committed.clear();
        } else if !self.composition.is_empty() {
            self.composition.pop();
            let len = self.composition.chars().count();
            self.composition_cursor.0 = self.composition_cursor.0.min(len);
        } else {
            self.committed.pop();
        }
    }

    pub(crate) fn confirm(&mut self) {
        if self.focused {
            self.replace_all = false;
        }
    }

    fn is_recent_commit(&self, fragment: &str, now: f64, window_secs: f64) -> bool {
        self.last_commit
            .as_ref()
            .is_some_and(|last| last.fragment == fragment && now - last.at_secs < window_secs)
    }
}

fn is_control_only(fragment: &str) -> bool {
    fragment.chars().all(|c| matches!(c, '\r' | '\n' | '\t'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> TextInputStateMachine {
        TextInputStateMachine::new(&Settings::default())
    }

    #[test]
    fn starts_unfocused_and_empty() {
        let field = field();
        assert_eq!(field.state(), TextInputState::Unfocused);
        assert_eq!(field.display_text(), "");
        assert!(!field.has_text());
    }

    #[test]
    fn input_is_ignored_while_unfocused() {
        let mut field = field();
        assert_eq!(field.commit("猫", 0.0), CommitOutcome::Unfocused);
        assert_eq!(field.composition_update("ね", 1, 0, 0.0), CompositionOutcome::Unfocused);
        field.backspace();
        assert_eq!(field.display_text(), "");
    }

    #[test]
    fn commit_append_debounce_and_backspace() {
        let mut field = field();
        field.focus_gain();
        assert_eq!(field.state(), TextInputState::FocusedReplaceAll);

        assert_eq!(field.commit("猫", 1.0), CommitOutcome::Replaced);
        assert_eq!(field.display_text(), "猫");
        assert!(!field.replace_all());
        assert_eq!(field.state(), TextInputState::FocusedIdle);

        assert_eq!(field.commit("犬", 2.0), CommitOutcome::Appended);
        assert_eq!(field.commit("犬", 2.02), CommitOutcome::Duplicate);
        assert_eq!(field.display_text(), "猫犬");

        field.backspace();
        assert_eq!(field.display_text(), "猫");
    }

    #[test]
    fn identical_commit_after_window_is_appended() {
        let mut field = field();
        field.focus_gain();
        field.commit("犬", 1.0);
        assert_eq!(field.commit("犬", 1.2), CommitOutcome::Appended);
        assert_eq!(field.committed(), "犬犬");
    }

    #[test]
    fn composition_consumes_replace_flag_then_commit_clears_it() {
        let mut field = field();
        field.focus_gain();
        field.commit("古い", 0.0);
        field.focus_loss();

        field.focus_gain();
        assert_eq!(field.composition_update("ねこ", 2, 0, 5.0), CompositionOutcome::Updated);
        assert_eq!(field.composition(), "ねこ");
        assert_eq!(field.committed(), "");
        assert_eq!(field.state(), TextInputState::FocusedComposing);

        assert_eq!(field.commit("猫", 5.5), CommitOutcome::Appended);
        assert_eq!(field.committed(), "猫");
        assert_eq!(field.composition(), "");
        assert_eq!(field.state(), TextInputState::FocusedIdle);
    }

    #[test]
    fn stale_composition_echo_is_suppressed() {
        let mut field = field();
        field.focus_gain();
        field.composition_update("ねこ", 2, 0, 0.0);
        field.commit("猫", 1.0);

        assert_eq!(
            field.composition_update("猫", 1, 0, 1.05),
            CompositionOutcome::GhostSuppressed
        );
        assert_eq!(field.composition(), "");
        assert_eq!(field.display_text(), "猫");

        assert_eq!(field.composition_update("猫", 1, 0, 1.5), CompositionOutcome::Updated);
        assert_eq!(field.display_text(), "猫猫");
    }

    #[test]
    fn control_fragments_do_not_mutate() {
        let mut field = field();
        field.focus_gain();
        field.commit("日", 0.0);
        for fragment in ["\r", "\n", "\t", "\r\n"] {
            assert_eq!(field.commit(fragment, 1.0), CommitOutcome::ControlIgnored);
        }
        assert_eq!(field.committed(), "日");
    }

    #[test]
    fn backspace_in_replace_mode_clears_everything_committed() {
        let mut field = field();
        field.focus_gain();
        field.commit("日本", 0.0);
        field.focus_gain();
        field.backspace();
        assert_eq!(field.committed(), "");
        assert_eq!(field.state(), TextInputState::FocusedIdle);
    }

    #[test]
    fn backspace_trims_composition_before_committed() {
        let mut field = field();
        field.focus_gain();
        field.commit("日", 0.0);
        field.composition_update("ほん", 2, 0, 1.0);
        field.backspace();
        assert_eq!(field.display_text(), "日ほ");
        assert_eq!(field.caret(), 2);
        field.backspace();
        field.backspace();
        assert_eq!(field.display_text(), "");
    }

    #[test]
    fn focus_loss_keeps_abandoned_composition() {
        let mut field = field();
        field.focus_gain();
        field.composition_update("か", 1, 0, 0.0);
        field.focus_loss();

        assert_eq!(field.state(), TextInputState::Unfocused);
        assert_eq!(field.composition(), "か");
        assert!(!field.replace_all());
        assert_eq!(field.composition_span(), None);
    }

    #[test]
    fn clear_empties_both_and_keeps_focus() {
        let mut field = field();
        field.focus_gain();
        field.commit("木", 0.0);
        field.composition_update("はやし", 3, 0, 1.0);
        field.clear();

        assert_eq!(field.display_text(), "");
        assert_eq!(field.state(), TextInputState::FocusedIdle);
    }

    #[test]
    fn enter_consumes_replace_flag_only() {
        let mut field = field();
        field.focus_gain();
        field.commit("森", 0.0);
        field.focus_gain();
        field.confirm();
        assert_eq!(field.commit("林", 1.0), CommitOutcome::Appended);
        assert_eq!(field.committed(), "森林");
    }

    #[test]
    fn composition_span_covers_composition_chars() {
        let mut field = field();
        field.focus_gain();
        field.commit("漢", 0.0);
        field.composition_update("じ", 1, 0, 1.0);
        assert_eq!(field.composition_span(), Some(1..2));
        assert_eq!(field.caret(), 2);
    }
}
