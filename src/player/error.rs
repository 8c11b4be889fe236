//! Playback control errors.

/// Errors returned by playback controls.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    #[error("Invalid playback speed {0}: speed must be a positive number")]
    InvalidSpeed(f64),
}
