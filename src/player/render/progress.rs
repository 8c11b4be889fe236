//! Progress bar rendering for the terminal player.
//!
//! Displays playback progress with marker indicators.

use std::io::Write;

use anyhow::Result;

use crate::document::MarkerPosition;

const PLAYHEAD: char = '⏺';
const MARKER: char = '◆';
const TRACK: char = '─';

/// Format milliseconds as MM:SS.
///
/// Fractional seconds are truncated; minutes are not wrapped into hours.
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Build the progress bar character array.
///
/// Returns the bar and the number of filled positions. The playhead sits at
/// the first unfilled position and hides any marker underneath it.
pub fn build_progress_bar_chars(
    bar_width: usize,
    current_ms: f64,
    total_ms: f64,
    markers: &[MarkerPosition],
) -> (Vec<char>, usize) {
    let progress = if total_ms > 0.0 {
        (current_ms / total_ms).clamp(0.0, 1.0)
    } else {
        1.0
    };

    let filled = (bar_width as f64 * progress) as usize;
    let mut bar = vec![TRACK; bar_width];

    if filled < bar_width {
        bar[filled] = PLAYHEAD;
    }

    for marker in markers {
        let marker_pos = if total_ms > 0.0 {
            ((marker.time as f64 / total_ms) * bar_width as f64) as usize
        } else {
            0
        };
        if marker_pos < bar_width && bar[marker_pos] != PLAYHEAD {
            bar[marker_pos] = MARKER;
        }
    }

    (bar, filled)
}

/// Render the progress bar with markers and a `MM:SS/MM:SS` readout.
pub fn render_progress_bar<W: Write>(
    out: &mut W,
    width: u16,
    row: u16,
    current_ms: f64,
    total_ms: u64,
    markers: &[MarkerPosition],
) -> Result<()> {
    // padding + time readout
    let bar_width = (width as usize).saturating_sub(14);
    let (bar, filled) = build_progress_bar_chars(bar_width, current_ms, total_ms as f64, markers);

    let time_display = format!(
        " {}/{}",
        format_duration(current_ms as u64),
        format_duration(total_ms)
    );

    let mut output = String::with_capacity(width as usize * 4);
    output.push_str(&format!("\x1b[{};1H", row + 1));
    output.push_str("\x1b[48;5;236m ");

    const GREEN: &str = "\x1b[32m";
    const YELLOW: &str = "\x1b[33m";
    const WHITE: &str = "\x1b[97m";
    const DARK_GREY: &str = "\x1b[90m";
    const GREY: &str = "\x1b[37m";

    output.push_str(GREEN);
    for (i, &c) in bar.iter().enumerate() {
        if i < filled {
            if c == MARKER {
                output.push_str(YELLOW);
                output.push(c);
                output.push_str(GREEN);
            } else {
                output.push('━');
            }
        } else if i == filled {
            output.push_str(WHITE);
            output.push(c);
        } else if c == MARKER {
            output.push_str(YELLOW);
            output.push(c);
        } else {
            output.push_str(DARK_GREY);
            output.push(c);
        }
    }

    output.push_str(GREY);
    output.push_str(&time_display);

    let used_width = 1 + bar_width + time_display.len();
    let remaining = (width as usize).saturating_sub(used_width);
    output.extend(std::iter::repeat(' ').take(remaining));

    output.push_str("\x1b[0m");
    write!(out, "{}", output)?;
    Ok(())
}
