//! Typing Session Replay.
//!
//! Deterministic playback of recorded text-editing sessions: keystrokes,
//! input mutations, IME composition and selection changes are replayed on a
//! virtual timeline and folded into the editor state they produce.

pub mod config;
pub mod document;
pub mod player;
pub mod reconstruct;

pub use config::Config;
pub use document::{Document, Event, EventKind, Format};
pub use player::{Engine, Player};
pub use reconstruct::{reconstruct, Reconstructor, TextState};
