//! Session playback.
//!
//! # Architecture
//!
//! - `engine`: timeline scheduling (virtual time, speed, pause/seek)
//! - `clock`: the wall-clock capability the engine is driven by
//! - `subscribers`: handler registry with snapshot delivery
//! - `seeking`: timeline lookups
//! - `input`: keyboard and mouse controls for the terminal player
//! - `render`: text formatting of progress and editor state for the CLI
//!
//! [`Player`] is the stock consumer: it feeds every delivered event into a
//! [`Reconstructor`] and resets it whenever the engine rewinds.
//!
//! # Usage
//!
//! ```
//! use tsr::document::{Document, Event, Session};
//! use tsr::player::{ManualClock, Player};
//!
//! let mut doc = Document::new(Session::default(), "");
//! doc.events.push(Event::snapshot(0, Some("h"), "h").with_pos(1));
//! doc.events.push(Event::snapshot(100, Some("i"), "hi").with_pos(2));
//!
//! let mut player = Player::new(&doc, ManualClock::new());
//! player.play();
//! player.run_until_idle();
//! assert_eq!(player.state().text, "hi");
//! ```

mod clock;
mod engine;
mod error;
pub mod input;
pub mod render;
mod seeking;
mod state;
mod subscribers;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::Engine;
pub use error::PlaybackError;
pub use seeking::find_event_index_at_time;
pub use state::PlaybackStatus;
pub use subscribers::{SubscriberRegistry, SubscriptionId};

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::config::PlaybackConfig;
use crate::document::Document;
use crate::reconstruct::{Reconstructor, TextState};

/// An engine wired to a reconstructor.
pub struct Player<C: Clock> {
    engine: Engine<C>,
    reconstructor: Rc<RefCell<Reconstructor>>,
    initial_text: Rc<RefCell<String>>,
    settings: PlaybackConfig,
}

impl<C: Clock> Player<C> {
    pub fn new(document: &Document, clock: C) -> Self {
        let reconstructor = Rc::new(RefCell::new(Reconstructor::new(
            document.initial_text.as_str(),
        )));
        let initial_text = Rc::new(RefCell::new(document.initial_text.clone()));
        let mut engine = Engine::new(clock);

        {
            let reconstructor = Rc::clone(&reconstructor);
            engine.on_event(move |event| reconstructor.borrow_mut().apply_event(event));
        }
        {
            let reconstructor = Rc::clone(&reconstructor);
            let initial_text = Rc::clone(&initial_text);
            engine.on_rewind(move || {
                reconstructor
                    .borrow_mut()
                    .reset(initial_text.borrow().as_str())
            });
        }
        engine.load_events(document.events.clone());

        Self {
            engine,
            reconstructor,
            initial_text,
            settings: PlaybackConfig::default(),
        }
    }

    /// Build a player and apply speed, looping and speed bounds from config.
    ///
    /// The starting speed is used as given; the bounds only limit
    /// [`speed_up`](Self::speed_up) and [`speed_down`](Self::speed_down).
    pub fn with_config(
        document: &Document,
        clock: C,
        settings: &PlaybackConfig,
    ) -> Result<Self, PlaybackError> {
        let mut player = Self::new(document, clock);
        player.settings = settings.clone();
        player.engine.set_looping(settings.looping);
        player.engine.set_speed(settings.speed)?;
        Ok(player)
    }

    /// Replace the loaded document and return to its initial text.
    pub fn load(&mut self, document: &Document) {
        *self.initial_text.borrow_mut() = document.initial_text.clone();
        self.engine.load_events(document.events.clone());
    }

    pub fn play(&mut self) {
        self.engine.play();
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    pub fn toggle_pause(&mut self) {
        if self.engine.is_playing() {
            self.engine.pause();
        } else {
            self.engine.play();
        }
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    pub fn seek(&mut self, time_ms: u64) {
        self.engine.seek(time_ms);
    }

    /// Seek forward by the configured step, stopping at the end.
    pub fn seek_forward(&mut self) {
        let target = self.playhead_ms().saturating_add(self.settings.seek_step_ms);
        self.engine.seek(target.min(self.engine.duration()));
    }

    /// Seek backward by the configured step, stopping at the start.
    pub fn seek_backward(&mut self) {
        let target = self.playhead_ms().saturating_sub(self.settings.seek_step_ms);
        self.engine.seek(target);
    }

    /// Current virtual time rounded to the nearest millisecond.
    fn playhead_ms(&self) -> u64 {
        self.engine.current_time().round() as u64
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), PlaybackError> {
        self.engine.set_speed(speed)
    }

    pub fn toggle_looping(&mut self) {
        let looping = !self.engine.looping();
        self.engine.set_looping(looping);
    }

    /// Multiply speed by the configured step, up to `max_speed`.
    pub fn speed_up(&mut self) -> Result<(), PlaybackError> {
        let speed = self.settings.clamp_speed(self.engine.speed() * self.settings.speed_step);
        self.engine.set_speed(speed)
    }

    /// Divide speed by the configured step, down to `min_speed`.
    pub fn speed_down(&mut self) -> Result<(), PlaybackError> {
        let speed = self.settings.clamp_speed(self.engine.speed() / self.settings.speed_step);
        self.engine.set_speed(speed)
    }

    pub fn tick(&mut self) -> usize {
        self.engine.tick()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.engine.next_deadline()
    }

    pub fn run_until_idle(&mut self) -> usize {
        self.engine.run_until_idle()
    }

    /// Independent copy of the reconstructed editor state.
    pub fn state(&self) -> TextState {
        self.reconstructor.borrow().state()
    }

    pub fn engine(&self) -> &Engine<C> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<C> {
        &mut self.engine
    }
}
