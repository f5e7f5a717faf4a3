//! Event Plumbing
//!
//! Per-tick event queue plus the append-only JSONL log. Systems push typed
//! events as they fire; the scenario loop drains the queue each tick and
//! hands the lines to the logger.

use bevy_ecs::prelude::*;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use traits_events::{Event, EventActor, EventKind};

use crate::components::pawn::{FactionKind, PawnId, PawnName};

/// Events produced during the current tick.
#[derive(Resource, Default)]
pub struct TickEvents {
    pub events: Vec<Event>,
}

impl TickEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

/// Resource logging events to a JSONL file and issuing sequential ids.
#[derive(Resource)]
pub struct EventLog {
    writer: Option<BufWriter<File>>,
    event_count: u64,
    next_event_id: u64,
}

impl EventLog {
    /// Create a log writing to the given path.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            event_count: 0,
            next_event_id: 1,
        })
    }

    /// Create a log that discards lines (for tests and dry runs).
    pub fn null() -> Self {
        Self {
            writer: None,
            event_count: 0,
            next_event_id: 1,
        }
    }

    /// Issue the next sequential event id.
    pub fn next_id(&mut self) -> String {
        let id = format!("evt_{:08}", self.next_event_id);
        self.next_event_id += 1;
        id
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Write one event line.
    pub fn log(&mut self, event: &Event) -> std::io::Result<()> {
        self.event_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = event.to_jsonl()?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EventLog {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("Warning: failed to flush event log: {}", e);
        }
    }
}

/// Identity snapshot of a pawn entity for event records.
pub fn actor_ref(world: &World, entity: Entity) -> EventActor {
    let id = world.get::<PawnId>(entity).map_or(0, |p| p.0);
    let name = world
        .get::<PawnName>(entity)
        .map_or_else(|| "unknown".to_string(), |n| n.0.clone());
    let faction = world
        .get::<FactionKind>(entity)
        .map_or("wildlife", |f| f.label());
    EventActor::new(id, name, faction)
}

/// Build an event with the next sequential id and queue it.
pub fn push_event(
    world: &mut World,
    kind: EventKind,
    actor: Entity,
    target: Option<Entity>,
    amount: Option<f32>,
    detail: Option<String>,
) {
    let tick = world.resource::<crate::SimulationState>().current_tick;
    let actor = actor_ref(world, actor);
    let target = target.map(|t| actor_ref(world, t));
    let id = world.resource_mut::<EventLog>().next_id();

    let mut event = Event::new(id, tick, kind, actor);
    event.target = target;
    event.amount = amount;
    event.detail = detail;
    world.resource_mut::<TickEvents>().push(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufRead;

    #[test]
    fn test_null_log_counts_without_writing() {
        let mut log = EventLog::null();
        let event = Event::new(
            log.next_id(),
            1,
            EventKind::Taunt,
            EventActor::new(1, "Brakka", "colony"),
        );
        log.log(&event).unwrap();
        assert_eq!(log.event_count(), 1);
    }

    #[test]
    fn test_sequential_ids() {
        let mut log = EventLog::null();
        assert_eq!(log.next_id(), "evt_00000001");
        assert_eq!(log.next_id(), "evt_00000002");
    }

    #[test]
    fn test_log_writes_parseable_lines() {
        let dir = std::env::temp_dir().join("traits_core_event_log_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("events.jsonl");

        let mut log = EventLog::new(&path).unwrap();
        let event = Event::new(
            log.next_id(),
            42,
            EventKind::RageStarted,
            EventActor::new(1, "Brakka", "colony"),
        );
        log.log(&event).unwrap();
        log.flush().unwrap();

        let file = File::open(&path).unwrap();
        let lines: Vec<String> = std::io::BufReader::new(file)
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 1);
        let parsed = Event::from_jsonl(&lines[0]).unwrap();
        assert_eq!(parsed.kind, EventKind::RageStarted);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_tick_events_drain() {
        let mut events = TickEvents::new();
        events.push(Event::new(
            "evt_00000001",
            1,
            EventKind::Taunt,
            EventActor::new(1, "Brakka", "colony"),
        ));
        assert_eq!(events.drain().len(), 1);
        assert!(events.events.is_empty());
    }
}
