//! Text-state reconstruction.
//!
//! A [`Reconstructor`] is a small state machine: it consumes events one at a
//! time, in order, and derives the committed buffer, caret, selection and IME
//! composition overlay. It has no notion of time and never fails; unknown
//! kinds and out-of-range positions are ignored.
//!
//! Snapshot input events are idempotent (re-applying one yields the same
//! buffer). Delta events are not: re-applying an insert inserts again.

mod state;

pub use state::TextState;

use crate::document::{CompositionPhase, Delta, Event, EventKind, InputPhase, TextChange};
use state::byte_offset;

/// Derives a [`TextState`] from an ordered event stream.
#[derive(Debug, Clone)]
pub struct Reconstructor {
    state: TextState,
}

impl Reconstructor {
    pub fn new(initial_text: impl Into<String>) -> Self {
        Self {
            state: TextState::new(initial_text),
        }
    }

    /// Discard all derived state and start over from `initial_text`.
    pub fn reset(&mut self, initial_text: impl Into<String>) {
        self.state = TextState::new(initial_text);
    }

    /// Independent copy of the current state.
    pub fn state(&self) -> TextState {
        self.state.clone()
    }

    /// Borrow the current state without copying.
    pub fn peek(&self) -> &TextState {
        &self.state
    }

    pub fn apply_event(&mut self, event: &Event) {
        match &event.kind {
            EventKind::Input {
                phase: InputPhase::After,
                change,
                ..
            } => self.apply_change(change, event.pos),
            // The matching `input` event carries the committed change
            EventKind::Input {
                phase: InputPhase::Before,
                ..
            } => {}
            EventKind::Composition { phase, data, .. } => self.apply_composition(*phase, data),
            EventKind::Selection { anchor, focus } => {
                let anchor = self.state.clamp(anchor.index);
                let focus = self.state.clamp(focus.index);
                self.state.selection_start = anchor.min(focus);
                self.state.selection_end = anchor.max(focus);
                self.state.cursor_position = focus;
            }
            EventKind::Key { .. } => {
                if let Some(pos) = event.pos {
                    self.state.cursor_position = self.state.clamp(pos);
                }
            }
            EventKind::Focus
            | EventKind::Blur
            | EventKind::Custom { .. }
            | EventKind::Unknown { .. } => {}
        }
    }

    fn apply_change(&mut self, change: &TextChange, pos: Option<i64>) {
        let len = self.state.len() as i64;
        let at = pos.unwrap_or(self.state.cursor_position as i64);

        match change {
            TextChange::Snapshot(text) => {
                self.state.text.clone_from(text);
                let cursor = match pos {
                    Some(pos) => self.state.clamp(pos),
                    None => self.state.len(),
                };
                self.state.collapse_to(cursor);
            }
            TextChange::Delta(Delta::Insert(data)) => {
                if at < 0 || at > len {
                    tracing::trace!(pos = at, len, "insert outside buffer ignored");
                    return;
                }
                let at = at as usize;
                let offset = byte_offset(&self.state.text, at);
                self.state.text.insert_str(offset, data);
                self.state.collapse_to(at + data.chars().count());
            }
            TextChange::Delta(Delta::DeleteBackward) => {
                if at <= 0 || at > len {
                    return;
                }
                let at = at as usize;
                self.remove_char(at - 1);
                self.state.collapse_to(at - 1);
            }
            TextChange::Delta(Delta::DeleteForward) => {
                if at < 0 || at >= len {
                    return;
                }
                let at = at as usize;
                self.remove_char(at);
                self.state.collapse_to(at);
            }
            // The removed range is not part of the event
            TextChange::Delta(Delta::CutOrDrag) | TextChange::Delta(Delta::Unsupported) => {}
        }
    }

    fn apply_composition(&mut self, phase: CompositionPhase, data: &Option<String>) {
        match phase {
            CompositionPhase::Start => {
                self.state.is_composing = true;
                self.state.composition_text = data.clone().unwrap_or_default();
            }
            CompositionPhase::Update => {
                // An update without a start is treated as already composing
                self.state.is_composing = true;
                if let Some(data) = data {
                    self.state.composition_text.clone_from(data);
                }
            }
            CompositionPhase::End => {
                self.state.is_composing = false;
                self.state.composition_text.clear();
            }
        }
    }

    fn remove_char(&mut self, index: usize) {
        let offset = byte_offset(&self.state.text, index);
        if offset < self.state.text.len() {
            self.state.text.remove(offset);
        }
    }
}

impl Default for Reconstructor {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Apply `events` in order to `initial_text` and return the final state.
pub fn reconstruct<'a, I>(initial_text: &str, events: I) -> TextState
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut reconstructor = Reconstructor::new(initial_text);
    for event in events {
        reconstructor.apply_event(event);
    }
    reconstructor.state()
}
