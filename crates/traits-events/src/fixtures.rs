//! Sample data fixtures for testing.
//!
//! Ready-made event data for other crates' tests. Enable the
//! `test-fixtures` feature to use these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // traits-events = { path = "../traits-events", features = ["test-fixtures"] }
//!
//! use traits_events::fixtures;
//!
//! let events = fixtures::sample_events();
//! ```

use crate::Event;

/// Returns the sample event stream from the fixtures file.
///
/// Covers a short berserker engagement: raid arrival, damage, rage entry,
/// a taunt, rage end, and a caravan departure.
pub fn sample_events() -> Vec<Event> {
    let jsonl = include_str!("../tests/fixtures/sample_events.jsonl");
    jsonl
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            Event::from_jsonl(l)
                .unwrap_or_else(|e| panic!("Failed to parse event line: {}\nError: {}", l, e))
        })
        .collect()
}

/// Returns a specific event by id from the sample events.
pub fn get_event(event_id: &str) -> Option<Event> {
    sample_events().into_iter().find(|e| e.event_id == event_id)
}

/// Returns the rage-entry event from the samples.
pub fn rage_started_event() -> Event {
    get_event("evt_00000004").expect("rage_started event should exist in fixtures")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventKind;

    #[test]
    fn test_sample_events_load() {
        let events = sample_events();
        assert_eq!(events.len(), 7, "should have 7 sample events");
        assert!(events.iter().any(|e| e.kind == EventKind::RageStarted));
        assert!(events.iter().any(|e| e.kind == EventKind::CaravanFormed));
    }

    #[test]
    fn test_events_are_tick_ordered() {
        let events = sample_events();
        for pair in events.windows(2) {
            assert!(pair[0].tick <= pair[1].tick);
        }
    }

    #[test]
    fn test_rage_started_fixture() {
        let event = rage_started_event();
        assert_eq!(event.kind, EventKind::RageStarted);
        assert_eq!(event.actor.name, "Brakka");
    }
}
