//! Timeline playback engine.
//!
//! Delivers a loaded, time-ordered event log to subscribed handlers at a
//! wall-clock pace scaled by `speed`. Virtual time (the position on the
//! recording's own timeline) advances while playing as
//!
//! ```text
//! V = P + (wall_now - resumed_at) * speed
//! ```
//!
//! where `P` is the virtual time frozen at the last pause or seek and
//! `resumed_at` is the wall-clock instant playback last (re)started.
//!
//! The engine is single-threaded and cooperative. It holds at most one pending
//! deadline; the caller drives delivery with [`Engine::tick`] (or
//! [`Engine::run_until_idle`]) and may sleep for [`Engine::next_deadline`]
//! in between. `pause`, `stop` and `seek` clear the pending deadline before
//! doing anything else, so nothing is delivered after they return.

use std::time::Duration;

use crate::document::Event;
use crate::player::clock::Clock;
use crate::player::error::PlaybackError;
use crate::player::seeking::find_event_index_at_time;
use crate::player::state::PlaybackStatus;
use crate::player::subscribers::{SubscriberRegistry, SubscriptionId};

const NANOS_PER_MS: f64 = 1_000_000.0;

/// Schedules delivery of recorded events against an injected [`Clock`].
pub struct Engine<C: Clock> {
    clock: C,
    events: Vec<Event>,
    subscribers: SubscriberRegistry,
    rewind_listeners: Vec<Box<dyn FnMut()>>,

    /// Index of the next undelivered event
    current_index: usize,
    /// Virtual time (ms) frozen at the last pause, seek or load
    frozen_time: f64,
    /// Wall-clock instant of the last resume
    resumed_at: Duration,
    speed: f64,
    looping: bool,
    status: PlaybackStatus,
    /// Wall-clock deadline of the single pending delivery
    pending: Option<Duration>,
}

impl<C: Clock> Engine<C> {
    pub fn new(clock: C) -> Self {
        let resumed_at = clock.now();
        Self {
            clock,
            events: Vec::new(),
            subscribers: SubscriberRegistry::new(),
            rewind_listeners: Vec::new(),
            current_index: 0,
            frozen_time: 0.0,
            resumed_at,
            speed: 1.0,
            looping: false,
            status: PlaybackStatus::Idle,
            pending: None,
        }
    }

    /// Replace the event log and return to the start, whatever the prior state.
    ///
    /// Speed and looping are kept.
    pub fn load_events(&mut self, events: Vec<Event>) {
        self.pending = None;
        self.events = events;
        self.current_index = 0;
        self.frozen_time = 0.0;
        self.resumed_at = self.clock.now();
        self.status = PlaybackStatus::Idle;
        tracing::debug!(events = self.events.len(), "loaded events");
        self.notify_rewind();
    }

    /// Register an event handler. Handlers run in registration order.
    pub fn on_event<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        self.subscribers.subscribe(handler)
    }

    /// Unregister a handler. Returns false if it was not registered.
    pub fn off_event(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Shared handle to the handler list, usable from inside a handler.
    pub fn subscribers(&self) -> SubscriberRegistry {
        self.subscribers.clone()
    }

    /// Register a listener called whenever delivery restarts from the first
    /// event: on load, stop, seek, loop wrap and replay after finishing.
    ///
    /// Consumers that accumulate state from delivered events reset it here.
    pub fn on_rewind<F>(&mut self, listener: F)
    where
        F: FnMut() + 'static,
    {
        self.rewind_listeners.push(Box::new(listener));
    }

    /// Start or resume playback.
    ///
    /// No-op while already playing or with nothing loaded. After the last
    /// event has been delivered, playback restarts from the beginning.
    pub fn play(&mut self) {
        if self.status == PlaybackStatus::Playing || self.events.is_empty() {
            return;
        }
        if self.status == PlaybackStatus::Finished {
            self.rewind();
        }

        self.resumed_at = self.clock.now();
        self.status = PlaybackStatus::Playing;
        tracing::debug!(
            time_ms = self.frozen_time,
            index = self.current_index,
            speed = self.speed,
            "play"
        );
        self.schedule_next();
    }

    /// Freeze virtual time and cancel the pending delivery.
    pub fn pause(&mut self) {
        if self.status != PlaybackStatus::Playing {
            return;
        }
        self.pending = None;
        self.frozen_time = self.virtual_time_at(self.clock.now());
        self.status = PlaybackStatus::Paused;
        tracing::debug!(time_ms = self.frozen_time, index = self.current_index, "pause");
    }

    /// Pause and return to the start of the recording.
    pub fn stop(&mut self) {
        self.pause();
        self.pending = None;
        self.rewind();
        self.status = PlaybackStatus::Idle;
        tracing::debug!("stop");
    }

    /// Change the playback speed without moving the playhead.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), PlaybackError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(PlaybackError::InvalidSpeed(speed));
        }

        let was_playing = self.is_playing();
        self.pause();
        self.speed = speed;
        tracing::debug!(speed, "speed changed");
        if was_playing {
            self.play();
        }
        Ok(())
    }

    /// Jump to `time_ms` on the recording's timeline.
    ///
    /// Every event up to and including the last one at or before `time_ms` is
    /// re-delivered synchronously, in order, starting from the first event.
    /// Handlers therefore see the full causal prefix and rebuild their state
    /// from scratch (rewind listeners fire first). Virtual time is set to
    /// exactly `time_ms`. Playback resumes if it was running.
    pub fn seek(&mut self, time_ms: u64) {
        let was_playing = self.is_playing();
        self.pause();
        self.pending = None;

        let found = find_event_index_at_time(&self.events, time_ms);
        let end = found.map_or(0, |index| index + 1);

        self.notify_rewind();
        for event in &self.events[..end] {
            self.subscribers.dispatch(event);
        }

        self.current_index = end;
        self.frozen_time = time_ms as f64;
        self.status = PlaybackStatus::Paused;
        tracing::debug!(time_ms, replayed = end, "seek");

        if was_playing {
            self.play();
        }
    }

    /// Deliver every event whose deadline has passed.
    ///
    /// Returns the number of events delivered. When looping, at most one wrap
    /// back to the start happens per call.
    pub fn tick(&mut self) -> usize {
        let mut delivered = 0;

        while self.status == PlaybackStatus::Playing {
            let Some(deadline) = self.pending else {
                break;
            };
            if self.clock.now() < deadline {
                break;
            }

            self.pending = None;
            if self.current_index >= self.events.len() {
                // Wrap armed by the previous pass
                if !self.looping {
                    self.reach_end();
                    break;
                }
                self.wrap();
                if self.schedule_next() {
                    break;
                }
                continue;
            }

            let index = self.current_index;
            self.current_index += 1;
            tracing::trace!(index, time_ms = self.events[index].time, "deliver");
            self.subscribers.dispatch(&self.events[index]);
            delivered += 1;

            if self.schedule_next() {
                break;
            }
        }

        delivered
    }

    /// Wall-clock time until the pending delivery, if playing.
    pub fn next_deadline(&self) -> Option<Duration> {
        if self.status != PlaybackStatus::Playing {
            return None;
        }
        self.pending
            .map(|deadline| deadline.saturating_sub(self.clock.now()))
    }

    /// Sleep on the clock and tick until nothing is pending.
    ///
    /// Returns the number of events delivered. Does not return while looping
    /// unless a handler-driven condition stops playback.
    pub fn run_until_idle(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(wait) = self.next_deadline() {
            if !wait.is_zero() {
                self.clock.sleep(wait);
            }
            delivered += self.tick();
        }
        delivered
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Current virtual time in milliseconds.
    pub fn current_time(&self) -> f64 {
        match self.status {
            PlaybackStatus::Playing => self.virtual_time_at(self.clock.now()),
            _ => self.frozen_time,
        }
    }

    /// Time of the last event, or 0 when nothing is loaded.
    pub fn duration(&self) -> u64 {
        self.events.last().map_or(0, |event| event.time)
    }

    /// Index of the next undelivered event.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn virtual_time_at(&self, now: Duration) -> f64 {
        let elapsed = now.saturating_sub(self.resumed_at);
        self.frozen_time + (elapsed.as_nanos() as f64 / NANOS_PER_MS) * self.speed
    }

    /// Arm the deadline for the next event, or handle the end of the log.
    ///
    /// Returns true if a loop wrap was armed.
    fn schedule_next(&mut self) -> bool {
        if self.current_index >= self.events.len() {
            return self.reach_end();
        }

        let now = self.clock.now();
        let target = self.events[self.current_index].time as f64;
        let delay_ms = ((target - self.virtual_time_at(now)) / self.speed).max(0.0);
        let delay = Duration::from_nanos((delay_ms * NANOS_PER_MS).ceil() as u64);
        self.pending = Some(now + delay);
        false
    }

    fn reach_end(&mut self) -> bool {
        if self.looping {
            // The wrap happens on the next tick so the last state stays observable
            self.pending = Some(self.clock.now());
            true
        } else {
            self.pending = None;
            self.frozen_time = self.virtual_time_at(self.clock.now());
            self.status = PlaybackStatus::Finished;
            tracing::debug!(time_ms = self.frozen_time, "finished");
            false
        }
    }

    fn wrap(&mut self) {
        tracing::debug!("loop");
        self.rewind();
        self.resumed_at = self.clock.now();
    }

    fn rewind(&mut self) {
        self.current_index = 0;
        self.frozen_time = 0.0;
        self.notify_rewind();
    }

    fn notify_rewind(&mut self) {
        for listener in &mut self.rewind_listeners {
            listener();
        }
    }
}

impl<C: Clock> std::fmt::Debug for Engine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("events", &self.events.len())
            .field("current_index", &self.current_index)
            .field("frozen_time", &self.frozen_time)
            .field("speed", &self.speed)
            .field("looping", &self.looping)
            .field("status", &self.status)
            .field("pending", &self.pending)
            .finish()
    }
}
