//! Editable-text state derived from replayed events.

use serde::Serialize;

/// Snapshot of the editor at some point of a replay.
///
/// Positions count Unicode scalar values (`char`s) of `text`. The composition
/// overlay lives in `composition_text` and is never part of `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextState {
    /// Committed buffer content
    pub text: String,
    pub cursor_position: usize,
    /// Lower bound of the selection (always `<= selection_end`)
    pub selection_start: usize,
    pub selection_end: usize,
    /// Whether an IME composition is in progress
    pub is_composing: bool,
    /// Uncommitted composition text
    pub composition_text: String,
}

impl TextState {
    /// Fresh state with the caret at the start of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Length of the committed buffer in chars.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn has_selection(&self) -> bool {
        self.selection_start != self.selection_end
    }

    /// The selected slice of the committed buffer.
    pub fn selected_text(&self) -> &str {
        let a = byte_offset(&self.text, self.selection_start);
        let b = byte_offset(&self.text, self.selection_end);
        &self.text[a.min(b)..a.max(b)]
    }

    /// Clamp a caret hint into `[0, len]`.
    pub(crate) fn clamp(&self, pos: i64) -> usize {
        if pos <= 0 {
            0
        } else {
            (pos as u64).min(self.len() as u64) as usize
        }
    }

    pub(crate) fn collapse_to(&mut self, pos: usize) {
        self.cursor_position = pos;
        self.selection_start = pos;
        self.selection_end = pos;
    }
}

/// Byte offset of the `index`-th char, or the end of `text` if out of range.
pub(crate) fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}
