//! Playback status shared by the engine and its callers.

/// Where the engine is in its lifecycle.
///
/// `Idle → Playing ⇄ Paused`, and `Playing → Finished` once the last event
/// has been delivered without looping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// Loaded (or stopped) and positioned at the start
    #[default]
    Idle,
    Playing,
    Paused,
    /// Every event has been delivered
    Finished,
}

impl PlaybackStatus {
    /// Short label for status lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Finished => "finished",
        }
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
