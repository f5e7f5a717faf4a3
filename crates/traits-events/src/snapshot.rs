//! World Snapshot Schema
//!
//! Periodic JSON captures of pawn and map state, written alongside the
//! event stream so a run can be inspected without replaying it.

use serde::{Deserialize, Serialize};

use crate::timestamp::SimTime;

/// A severity-bearing status effect on a pawn, as captured in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HediffSnapshot {
    pub kind: String,
    pub severity: f32,
    pub stage: String,
}

/// Snapshot of a single pawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PawnSnapshot {
    pub pawn_id: u64,
    pub name: String,
    pub faction: String,
    pub kind: String,
    pub position: (i32, i32),
    pub health: f32,
    pub max_health: f32,
    pub downed: bool,
    pub dead: bool,
    pub drafted: bool,
    pub traits: Vec<String>,
    pub hediffs: Vec<HediffSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mental_state: Option<String>,
    pub mood_offset: f32,
}

/// Snapshot of a door.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorSnapshot {
    pub position: (i32, i32),
    pub open: bool,
    pub held_open: bool,
}

/// Full world snapshot at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub time: SimTime,
    /// Why the snapshot was taken: `simulation_start`, `periodic`,
    /// `simulation_end`.
    pub label: String,
    pub pawns: Vec<PawnSnapshot>,
    pub doors: Vec<DoorSnapshot>,
    /// Total filth tracked indoors so far.
    pub filth_total: f32,
}

impl Snapshot {
    /// Looks up a pawn snapshot by id.
    pub fn pawn(&self, pawn_id: u64) -> Option<&PawnSnapshot> {
        self.pawns.iter().find(|p| p.pawn_id == pawn_id)
    }

    /// Number of pawns still standing (alive and not downed).
    pub fn standing_count(&self) -> usize {
        self.pawns.iter().filter(|p| !p.dead && !p.downed).count()
    }
}
