//! Status bar rendering for the terminal player.
//!
//! Displays playback status, speed, loop and marker indicators, and the
//! keyboard shortcuts.

use std::io::Write;

use anyhow::Result;

use crate::player::PlaybackStatus;

const WHITE: &str = "\x1b[97m";
const GREEN: &str = "\x1b[32m";
const DARK_GREY: &str = "\x1b[90m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

const SHORTCUTS: &[(&str, &str)] = &[
    ("space", "play"),
    ("←→", "seek"),
    ("+-", "spd"),
    ("l", "loop"),
    ("r", "rst"),
    ("q", "quit"),
];

/// Plain status text without colors.
pub fn build_status_text(
    status: PlaybackStatus,
    speed: f64,
    looping: bool,
    marker_count: usize,
) -> String {
    let mut text = format!("{} spd:{:.1}x", status.label(), speed);
    if looping {
        text.push_str(" [L]");
    }
    if marker_count > 0 {
        text.push_str(&format!(" ◆{}", marker_count));
    }
    text
}

/// Render a separator line.
pub fn render_separator_line<W: Write>(out: &mut W, width: u16, row: u16) -> Result<()> {
    let mut output = String::with_capacity(width as usize * 3 + 20);
    output.push_str(&format!("\x1b[{};1H{}", row + 1, DARK_GREY));
    output.extend(std::iter::repeat('─').take(width as usize));
    output.push_str(RESET);
    write!(out, "{}", output)?;
    Ok(())
}

/// Render the status/controls bar.
pub fn render_status_bar<W: Write>(
    out: &mut W,
    width: u16,
    row: u16,
    status: PlaybackStatus,
    speed: f64,
    looping: bool,
    marker_count: usize,
) -> Result<()> {
    let mut output = String::with_capacity(256);
    let mut visible_len: usize = 0;

    output.push_str(&format!("\x1b[{};1H", row + 1));

    output.push_str(WHITE);
    let state = format!(" {} ", status.label());
    visible_len += state.len();
    output.push_str(&state);

    output.push_str(DARK_GREY);
    output.push_str("spd:");
    output.push_str(WHITE);
    let speed_str = format!("{:.1}x ", speed);
    visible_len += 4 + speed_str.len();
    output.push_str(&speed_str);

    if looping {
        output.push_str(GREEN);
        output.push_str("[L] ");
        visible_len += 4;
    }

    if marker_count > 0 {
        output.push_str(YELLOW);
        let marker_str = format!("◆{} ", marker_count);
        visible_len += marker_str.chars().count();
        output.push_str(&marker_str);
    }

    output.push_str(DARK_GREY);
    output.push('│');
    visible_len += 1;
    for (key, action) in SHORTCUTS {
        output.push(' ');
        output.push_str(CYAN);
        output.push_str(key);
        output.push_str(DARK_GREY);
        output.push(':');
        output.push_str(action);
        visible_len += 2 + key.chars().count() + action.len();
    }

    let padding = (width as usize).saturating_sub(visible_len);
    output.extend(std::iter::repeat(' ').take(padding));

    output.push_str(RESET);
    write!(out, "{}", output)?;
    Ok(())
}
