//! Timeline lookups used by seeking.

use crate::document::Event;

/// Find the highest index whose event time is `<= time_ms`.
///
/// Events sharing a timestamp are all included. Returns `None` when every
/// event lies after `time_ms`. Assumes `events` is sorted by time.
pub fn find_event_index_at_time(events: &[Event], time_ms: u64) -> Option<usize> {
    let count = events.partition_point(|event| event.time <= time_ms);
    count.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::EventKind;

    fn events_at(times: &[u64]) -> Vec<Event> {
        times
            .iter()
            .map(|&time| Event::new(time, EventKind::Focus))
            .collect()
    }

    #[test]
    fn empty_log_has_no_index() {
        assert_eq!(find_event_index_at_time(&[], 100), None);
    }

    #[test]
    fn before_first_event_has_no_index() {
        let events = events_at(&[50, 100]);
        assert_eq!(find_event_index_at_time(&events, 49), None);
    }

    #[test]
    fn exact_match_is_included() {
        let events = events_at(&[0, 100, 200]);
        assert_eq!(find_event_index_at_time(&events, 100), Some(1));
    }

    #[test]
    fn ties_are_all_included() {
        let events = events_at(&[0, 100, 100, 100, 200]);
        assert_eq!(find_event_index_at_time(&events, 100), Some(3));
        assert_eq!(find_event_index_at_time(&events, 150), Some(3));
    }

    #[test]
    fn past_end_returns_last() {
        let events = events_at(&[0, 100]);
        assert_eq!(find_event_index_at_time(&events, 10_000), Some(1));
    }
}
