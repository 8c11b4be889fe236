//! Editor text rendering.
//!
//! The caret is drawn as `|`, a selection as `[...]`, and an active
//! composition as `‹...›` in front of the caret.

use std::io::Write;

use anyhow::Result;

use crate::reconstruct::TextState;

/// Annotate the buffer with caret, selection and composition markers.
pub fn annotate_text_state(state: &TextState) -> String {
    let mut out = String::with_capacity(state.text.len() + state.composition_text.len() + 8);
    let selecting = state.has_selection();
    let sel_start = state.selection_start.min(state.selection_end);
    let sel_end = state.selection_start.max(state.selection_end);
    let mut chars = state.text.chars();

    for i in 0..=state.len() {
        if selecting && i == sel_end {
            out.push(']');
        }
        if i == state.cursor_position {
            if state.is_composing && !state.composition_text.is_empty() {
                out.push('‹');
                out.push_str(&state.composition_text);
                out.push('›');
            }
            if !selecting {
                out.push('|');
            }
        }
        if selecting && i == sel_start {
            out.push('[');
        }
        if let Some(c) = chars.next() {
            out.push(c);
        }
    }
    out
}

/// Draw the annotated buffer into `rows` lines starting at `row`.
///
/// Lines longer than `width` are cut; unused rows are cleared.
pub fn render_text_state<W: Write>(
    out: &mut W,
    width: u16,
    row: u16,
    rows: u16,
    state: &TextState,
) -> Result<()> {
    let annotated = annotate_text_state(state);
    let mut lines = annotated.split('\n');

    let mut output = String::with_capacity(annotated.len() + rows as usize * 12);
    for offset in 0..rows {
        output.push_str(&format!("\x1b[{};1H\x1b[2K", row + offset + 1));
        if let Some(line) = lines.next() {
            output.extend(line.chars().take(width as usize));
        }
    }
    write!(out, "{}", output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(text: &str, cursor: usize) -> TextState {
        TextState {
            cursor_position: cursor,
            selection_start: cursor,
            selection_end: cursor,
            ..TextState::new(text)
        }
    }

    #[test]
    fn caret_is_drawn_at_cursor() {
        assert_eq!(annotate_text_state(&state("hello", 2)), "he|llo");
        assert_eq!(annotate_text_state(&state("hello", 5)), "hello|");
        assert_eq!(annotate_text_state(&state("", 0)), "|");
    }

    #[test]
    fn selection_replaces_caret() {
        let s = TextState {
            cursor_position: 3,
            selection_start: 1,
            selection_end: 3,
            ..TextState::new("hello")
        };
        assert_eq!(annotate_text_state(&s), "h[el]lo");
    }

    #[test]
    fn reversed_selection_is_normalized() {
        let s = TextState {
            cursor_position: 1,
            selection_start: 3,
            selection_end: 1,
            ..TextState::new("hello")
        };
        assert_eq!(annotate_text_state(&s), "h[el]lo");
    }

    #[test]
    fn composition_precedes_caret() {
        let s = TextState {
            is_composing: true,
            composition_text: "か".to_string(),
            ..state("ab", 2)
        };
        assert_eq!(annotate_text_state(&s), "ab‹か›|");
    }

    #[test]
    fn multibyte_positions_count_chars() {
        assert_eq!(annotate_text_state(&state("日本語", 1)), "日|本語");
    }

    #[test]
    fn render_clears_and_cuts_lines() {
        let mut out = Vec::new();
        render_text_state(&mut out, 3, 0, 3, &state("abcdef\nx", 0)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b[1;1H\x1b[2K|ab"));
        assert!(text.contains("\x1b[2;1H\x1b[2Kx"));
        assert!(text.ends_with("\x1b[3;1H\x1b[2K"));
    }
}
