//! Input handling for the terminal player.
//!
//! Translates crossterm key and mouse events into [`Player`] controls and
//! tells the caller whether to keep running.

mod keyboard;
mod mouse;

pub use keyboard::handle_key_event;
pub use mouse::handle_mouse_event;

use crossterm::event::Event;

use crate::document::MarkerPosition;
use crate::player::render::Layout;
use crate::player::{Clock, Player};

/// Result of handling one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
}

/// Dispatch any terminal event to its handler.
///
/// Resize events update `layout` in place.
pub fn handle_event<C: Clock>(
    event: Event,
    player: &mut Player<C>,
    markers: &[MarkerPosition],
    layout: &mut Layout,
) -> InputResult {
    match event {
        Event::Key(key) => handle_key_event(key, player, markers),
        Event::Mouse(mouse) => handle_mouse_event(mouse, player, layout),
        Event::Resize(cols, rows) => {
            *layout = Layout::new(cols, rows);
            InputResult::Continue
        }
        _ => InputResult::Continue,
    }
}
