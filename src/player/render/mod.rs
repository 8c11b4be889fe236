//! Rendering components for the terminal player.
//!
//! Formatting helpers for the progress bar, the status bar, and the
//! reconstructed editor text. The `build_*` and `format_*` functions are pure;
//! the `render_*` functions write ANSI output at a given row.

mod progress;
mod status;
mod text;

pub use progress::{build_progress_bar_chars, format_duration, render_progress_bar};
pub use status::{build_status_text, render_separator_line, render_status_bar};
pub use text::{annotate_text_state, render_text_state};

/// Rows used below the text area: separator, progress bar, status bar.
pub const STATUS_LINES: u16 = 3;

/// Screen regions of the terminal player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub cols: u16,
    pub rows: u16,
}

impl Layout {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Rows available for the editor text.
    pub fn text_rows(&self) -> u16 {
        self.rows.saturating_sub(STATUS_LINES)
    }

    pub fn separator_row(&self) -> u16 {
        self.text_rows()
    }

    pub fn progress_row(&self) -> u16 {
        self.rows.saturating_sub(2)
    }

    pub fn status_row(&self) -> u16 {
        self.rows.saturating_sub(1)
    }

    /// Column range `(start, width)` of the progress track.
    pub fn progress_track(&self) -> (u16, u16) {
        (1, self.cols.saturating_sub(14))
    }
}
