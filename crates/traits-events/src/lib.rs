//! Event and snapshot schema for the trait-pack simulation.
//!
//! This crate owns the serialized surface of the simulation: the JSONL
//! event stream, periodic world snapshots, and simulation-time formatting.
//! It has no dependency on the engine so downstream tooling can parse the
//! output without pulling in the simulation itself.

pub mod event;
pub mod snapshot;
pub mod timestamp;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

pub use event::{Event, EventActor, EventKind};
pub use snapshot::{DoorSnapshot, HediffSnapshot, PawnSnapshot, Snapshot};
pub use timestamp::{SimTime, TICKS_PER_HOUR};
