//! Mouse input handling for the terminal player.
//!
//! Handles click-to-seek on the progress bar.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use super::InputResult;
use crate::player::render::Layout;
use crate::player::{Clock, Player};

/// Map a click column on the progress track to a timeline position.
///
/// Returns `None` for clicks outside the track.
pub(crate) fn click_to_time(layout: &Layout, column: u16, duration_ms: u64) -> Option<u64> {
    let (start, width) = layout.progress_track();
    if width == 0 || column < start || column >= start + width {
        return None;
    }
    let ratio = (column - start) as f64 / width as f64;
    Some(((ratio * duration_ms as f64) as u64).min(duration_ms))
}

/// Handle a mouse event.
pub fn handle_mouse_event<C: Clock>(
    mouse: MouseEvent,
    player: &mut Player<C>,
    layout: &Layout,
) -> InputResult {
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        if mouse.row == layout.progress_row() {
            let duration = player.engine().duration();
            if let Some(time) = click_to_time(layout, mouse.column, duration) {
                player.seek(time);
            }
        }
    }
    InputResult::Continue
}
