//! Modal text entry for save-to-folder, rename, and subfolder navigation.
//!
//! At most one modal is active at a time; while one is open it captures the
//! whole keyboard. Enter commits the trimmed buffer, Escape cancels without
//! side effects, and Tab cycles forward through the suggestion list,
//! replacing the buffer with the highlighted suggestion and refreshing the
//! suggestions against the new buffer value.

use crate::ui::keys::{Key, KeyEvent};

/// Which text-entry overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    /// Move the selected clip into a named subfolder.
    SaveToFolder,
    /// Rename the selected clip in place.
    Rename,
    /// Change the working directory to a subfolder.
    NavigateDown,
}

/// What a key press did to the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome {
    /// Modal stays open.
    Pending,
    /// Escape: close with no side effects.
    Cancelled,
    /// Enter: close and act on the trimmed input. An empty string means
    /// commit-as-no-op (close without acting).
    Committed(String),
}

/// State of the active modal: input buffer, ordered suggestions, and the
/// wrapped highlight index.
#[derive(Debug)]
pub struct ModalState {
    kind: ModalKind,
    buffer: String,
    suggestions: Vec<String>,
    highlighted: Option<usize>,
}

impl ModalState {
    /// Opens a modal. `initial` seeds the buffer (the current file name for
    /// rename, empty otherwise); suggestions are computed immediately.
    pub fn open(kind: ModalKind, initial: &str, suggest: impl Fn(&str) -> Vec<String>) -> Self {
        let mut modal = Self {
            kind,
            buffer: initial.to_string(),
            suggestions: Vec::new(),
            highlighted: None,
        };
        modal.suggestions = suggest(&modal.buffer);
        modal
    }

    pub fn kind(&self) -> ModalKind {
        self.kind
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Feeds one key event into the modal. `suggest` recomputes the
    /// suggestion list whenever the buffer changes.
    pub fn handle_key(
        &mut self,
        event: KeyEvent,
        suggest: impl Fn(&str) -> Vec<String>,
    ) -> ModalOutcome {
        match event.key {
            Key::Escape => ModalOutcome::Cancelled,
            Key::Enter => ModalOutcome::Committed(self.buffer.trim().to_string()),
            Key::Tab => {
                self.cycle_suggestion(suggest);
                ModalOutcome::Pending
            }
            Key::Backspace => {
                if self.buffer.pop().is_some() {
                    self.refresh_after_edit(suggest);
                }
                ModalOutcome::Pending
            }
            Key::Char(c) if !event.mods.ctrl => {
                self.buffer.push(c);
                self.refresh_after_edit(suggest);
                ModalOutcome::Pending
            }
            _ => ModalOutcome::Pending,
        }
    }

    /// Tab: advance the highlight (wrapping), take that suggestion as the
    /// buffer, then refresh suggestions against the new buffer. The highlight
    /// follows the taken suggestion into the refreshed list.
    fn cycle_suggestion(&mut self, suggest: impl Fn(&str) -> Vec<String>) {
        if self.suggestions.is_empty() {
            return;
        }

        let next = match self.highlighted {
            Some(h) => (h + 1) % self.suggestions.len(),
            None => 0,
        };
        self.buffer = self.suggestions[next].clone();

        self.suggestions = suggest(&self.buffer);
        self.highlighted = self.suggestions.iter().position(|s| *s == self.buffer);
    }

    /// A text edit invalidates the highlight; the next Tab starts from the
    /// top of the fresh list.
    fn refresh_after_edit(&mut self, suggest: impl Fn(&str) -> Vec<String>) {
        self.suggestions = suggest(&self.buffer);
        self.highlighted = None;
    }
}

/// Case-insensitive prefix filter used by the folder modals.
pub fn prefix_matches(candidates: &[String], input: &str) -> Vec<String> {
    if input.is_empty() {
        return Vec::new();
    }
    let needle = input.to_lowercase();
    candidates
        .iter()
        .filter(|c| c.to_lowercase().starts_with(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::keys::Modifiers;

    fn folders() -> Vec<String> {
        vec!["nice".to_string(), "nicer".to_string(), "del".to_string()]
    }

    fn suggest(input: &str) -> Vec<String> {
        prefix_matches(&folders(), input)
    }

    fn type_str(modal: &mut ModalState, text: &str) {
        for c in text.chars() {
            modal.handle_key(KeyEvent::ch(c), suggest);
        }
    }

    #[test]
    fn test_prefix_match_is_case_insensitive() {
        assert_eq!(
            prefix_matches(&folders(), "NIC"),
            vec!["nice".to_string(), "nicer".to_string()]
        );
        assert!(prefix_matches(&folders(), "").is_empty());
        assert!(prefix_matches(&folders(), "x").is_empty());
    }

    #[test]
    fn test_tab_cycles_through_suggestions() {
        // Scenario: subfolders nice/nicer, buffer "nic".
        let mut modal = ModalState::open(ModalKind::SaveToFolder, "", suggest);
        type_str(&mut modal, "nic");
        assert_eq!(modal.suggestions(), &["nice", "nicer"]);
        assert_eq!(modal.highlighted(), None);

        // First Tab takes the first suggestion.
        modal.handle_key(KeyEvent::plain(Key::Tab), suggest);
        assert_eq!(modal.buffer(), "nice");
        assert_eq!(modal.highlighted(), Some(0));
        // "nice" is a prefix of both, so the refreshed list keeps both.
        assert_eq!(modal.suggestions(), &["nice", "nicer"]);

        // Second Tab advances to the next one.
        modal.handle_key(KeyEvent::plain(Key::Tab), suggest);
        assert_eq!(modal.buffer(), "nicer");
    }

    #[test]
    fn test_tab_with_no_suggestions_is_noop() {
        let mut modal = ModalState::open(ModalKind::SaveToFolder, "", suggest);
        type_str(&mut modal, "zzz");
        modal.handle_key(KeyEvent::plain(Key::Tab), suggest);
        assert_eq!(modal.buffer(), "zzz");
        assert_eq!(modal.highlighted(), None);
    }

    #[test]
    fn test_edit_recomputes_and_clears_highlight() {
        let mut modal = ModalState::open(ModalKind::SaveToFolder, "", suggest);
        type_str(&mut modal, "nic");
        modal.handle_key(KeyEvent::plain(Key::Tab), suggest);
        assert_eq!(modal.highlighted(), Some(0));

        modal.handle_key(KeyEvent::plain(Key::Backspace), suggest);
        assert_eq!(modal.buffer(), "nic");
        assert_eq!(modal.highlighted(), None);

        type_str(&mut modal, "x");
        assert!(modal.suggestions().is_empty());
    }

    #[test]
    fn test_escape_cancels() {
        let mut modal = ModalState::open(ModalKind::Rename, "clip.mp4", suggest);
        let outcome = modal.handle_key(KeyEvent::plain(Key::Escape), suggest);
        assert_eq!(outcome, ModalOutcome::Cancelled);
    }

    #[test]
    fn test_enter_commits_trimmed_buffer() {
        let mut modal = ModalState::open(ModalKind::SaveToFolder, "", suggest);
        type_str(&mut modal, "  keep  ");
        let outcome = modal.handle_key(KeyEvent::plain(Key::Enter), suggest);
        assert_eq!(outcome, ModalOutcome::Committed("keep".to_string()));
    }

    #[test]
    fn test_enter_on_empty_buffer_commits_empty() {
        let mut modal = ModalState::open(ModalKind::SaveToFolder, "", suggest);
        let outcome = modal.handle_key(KeyEvent::plain(Key::Enter), suggest);
        assert_eq!(outcome, ModalOutcome::Committed(String::new()));
    }

    #[test]
    fn test_rename_modal_seeds_buffer() {
        let modal = ModalState::open(ModalKind::Rename, "clip.mp4", |_| Vec::new());
        assert_eq!(modal.buffer(), "clip.mp4");
        assert_eq!(modal.kind(), ModalKind::Rename);
    }

    #[test]
    fn test_ctrl_chars_are_ignored() {
        let mut modal = ModalState::open(ModalKind::SaveToFolder, "", suggest);
        modal.handle_key(KeyEvent::new(Key::Char('d'), Modifiers::CTRL), suggest);
        assert_eq!(modal.buffer(), "");
    }
}
