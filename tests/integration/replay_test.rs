//! Integration tests for timed playback and reconstruction

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::helpers::load_fixture;
use tsr::player::{Clock, ManualClock, PlaybackStatus, SubscriptionId};
use tsr::{reconstruct, Player, TextState};

#[test]
fn full_replay_matches_reconstruction() {
    for name in ["typing.json", "session.ndjson"] {
        let doc = load_fixture(name);
        let mut player = Player::new(&doc, ManualClock::new());
        player.play();
        player.run_until_idle();

        assert_eq!(player.engine().status(), PlaybackStatus::Finished);
        assert_eq!(player.state(), reconstruct(&doc.initial_text, &doc.events));
    }
}

#[test]
fn typing_fixture_final_state() {
    let doc = load_fixture("typing.json");
    let state = reconstruct(&doc.initial_text, &doc.events);
    assert_eq!(
        state,
        TextState {
            text: "Yo!".to_string(),
            cursor_position: 2,
            selection_start: 2,
            selection_end: 2,
            is_composing: false,
            composition_text: String::new(),
        }
    );
}

#[test]
fn streaming_fixture_final_state() {
    let doc = load_fixture("session.ndjson");
    let state = reconstruct(&doc.initial_text, &doc.events);
    assert_eq!(state.text, "abX");
    assert_eq!(state.cursor_position, 3);
}

#[test]
fn seek_lands_mid_composition() {
    let doc = load_fixture("typing.json");
    let mut player = Player::new(&doc, ManualClock::new());
    player.seek(950);

    let state = player.state();
    assert_eq!(state.text, "Hi!");
    assert!(state.is_composing);
    assert_eq!(state.composition_text, "に");
    assert_eq!(player.engine().current_time(), 950.0);
}

#[test]
fn events_fire_at_scaled_wall_times() {
    let doc = load_fixture("typing.json");
    let clock = ManualClock::new();
    let mut player = Player::new(&doc, clock.clone());
    player.set_speed(2.0).unwrap();

    let fired = Rc::new(RefCell::new(Vec::new()));
    {
        let fired = Rc::clone(&fired);
        let clock = clock.clone();
        player
            .engine_mut()
            .on_event(move |event| fired.borrow_mut().push((clock.now().as_millis() as u64, event.time)));
    }

    player.play();
    player.run_until_idle();

    let fired = fired.borrow();
    assert_eq!(fired.len(), doc.events.len());
    for (wall_ms, event_ms) in fired.iter() {
        assert_eq!(*wall_ms, event_ms / 2, "event at {event_ms} fired at {wall_ms}");
    }
}

#[test]
fn pause_freezes_the_timeline() {
    let doc = load_fixture("typing.json");
    let clock = ManualClock::new();
    let mut player = Player::new(&doc, clock.clone());

    player.play();
    clock.advance_ms(600);
    assert_eq!(player.tick(), 5);
    player.pause();

    clock.advance_ms(10_000);
    assert_eq!(player.tick(), 0);
    assert_eq!(player.engine().current_time(), 600.0);
    assert_eq!(player.next_deadline(), None);

    player.play();
    clock.advance_ms(200);
    assert_eq!(player.tick(), 1);
    assert!(player.state().is_composing);
}

#[test]
fn seek_while_playing_keeps_playing() {
    let doc = load_fixture("typing.json");
    let clock = ManualClock::new();
    let mut player = Player::new(&doc, clock.clone());

    player.play();
    clock.advance_ms(100);
    player.tick();
    player.seek(1000);
    assert!(player.engine().is_playing());
    assert_eq!(player.state().text, "Hi!に");

    clock.advance_ms(100);
    assert_eq!(player.tick(), 0);
    clock.advance_ms(100);
    assert_eq!(player.tick(), 1);
    assert_eq!(player.state().text, "Hi!");
}

#[test]
fn subscriber_can_unsubscribe_itself() {
    let doc = load_fixture("session.ndjson");
    let mut player = Player::new(&doc, ManualClock::new());
    let registry = player.engine().subscribers();

    let seen = Rc::new(Cell::new(0));
    let own_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
    let id = {
        let seen = Rc::clone(&seen);
        let own_id = Rc::clone(&own_id);
        player.engine_mut().on_event(move |_| {
            seen.set(seen.get() + 1);
            if seen.get() == 3 {
                if let Some(id) = own_id.get() {
                    registry.unsubscribe(id);
                }
            }
        })
    };
    own_id.set(Some(id));

    player.play();
    player.run_until_idle();
    assert_eq!(seen.get(), 3);
    // The reconstructor subscription is unaffected
    assert_eq!(player.state().text, "abX");
}

#[test]
fn replay_after_finish_starts_over() {
    let doc = load_fixture("session.ndjson");
    let clock = ManualClock::new();
    let mut player = Player::new(&doc, clock.clone());
    player.play();
    player.run_until_idle();
    assert_eq!(player.engine().status(), PlaybackStatus::Finished);

    player.play();
    assert_eq!(player.tick(), 1);
    assert_eq!(player.engine().current_index(), 1);
    assert_eq!(player.state().text, "abc");
}
