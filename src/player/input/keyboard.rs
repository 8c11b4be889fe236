//! Keyboard shortcuts for the terminal player.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::InputResult;
use crate::document::MarkerPosition;
use crate::player::{Clock, Player};

/// Handle a keyboard event.
pub fn handle_key_event<C: Clock>(
    key: KeyEvent,
    player: &mut Player<C>,
    markers: &[MarkerPosition],
) -> InputResult {
    if key.kind == KeyEventKind::Release {
        return InputResult::Continue;
    }

    match key.code {
        // === Quit ===
        KeyCode::Char('q') | KeyCode::Esc => return InputResult::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return InputResult::Quit
        }

        // === Playback controls ===
        KeyCode::Char(' ') => player.toggle_pause(),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            if let Err(err) = player.speed_up() {
                tracing::warn!(%err, "speed change rejected");
            }
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            if let Err(err) = player.speed_down() {
                tracing::warn!(%err, "speed change rejected");
            }
        }
        KeyCode::Char('l') => player.toggle_looping(),
        KeyCode::Char('r') => {
            player.stop();
            player.play();
        }

        // === Seeking ===
        KeyCode::Left | KeyCode::Char('<') | KeyCode::Char(',') => player.seek_backward(),
        KeyCode::Right | KeyCode::Char('>') | KeyCode::Char('.') => player.seek_forward(),
        KeyCode::Home => player.seek(0),
        KeyCode::End => {
            let end = player.engine().duration();
            player.seek(end);
        }
        KeyCode::Char('m') => jump_to_next_marker(player, markers),

        _ => {}
    }
    InputResult::Continue
}

/// Seek to the first marker strictly after the playhead.
fn jump_to_next_marker<C: Clock>(player: &mut Player<C>, markers: &[MarkerPosition]) {
    let now = player.engine().current_time();
    if let Some(next) = markers.iter().find(|m| m.time as f64 > now) {
        tracing::debug!(label = %next.label, time_ms = next.time, "jump to marker");
        player.seek(next.time);
    }
}
