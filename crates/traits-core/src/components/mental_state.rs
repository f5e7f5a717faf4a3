//! Mental State Components
//!
//! An exclusive forced-behavior slot per pawn. At most one state is active
//! at a time; starting a new one while the slot is occupied fails.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Forced-behavior modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentalStateKind {
    /// Uncontrollable melee aggression with periodic taunts.
    Berserking,
    /// Fleeing from danger.
    Panic,
    /// Asleep on the spot from boredom.
    Dozing,
}

impl MentalStateKind {
    pub fn label(self) -> &'static str {
        match self {
            MentalStateKind::Berserking => "berserking",
            MentalStateKind::Panic => "panic",
            MentalStateKind::Dozing => "dozing",
        }
    }
}

/// An active mental state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MentalState {
    pub kind: MentalStateKind,
    pub started_tick: u64,
    /// States with an expiry end on their own; Berserking has none and is
    /// ended by the ire machinery.
    pub expires_at: Option<u64>,
}

/// The exclusive slot holding a pawn's current mental state.
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct MentalStateSlot {
    current: Option<MentalState>,
}

impl MentalStateSlot {
    pub fn current(&self) -> Option<&MentalState> {
        self.current.as_ref()
    }

    pub fn current_kind(&self) -> Option<MentalStateKind> {
        self.current.map(|s| s.kind)
    }

    pub fn is(&self, kind: MentalStateKind) -> bool {
        self.current_kind() == Some(kind)
    }

    /// Attempts to start a state. Fails, leaving the slot unchanged, when
    /// any state is already active.
    pub fn try_start(
        &mut self,
        kind: MentalStateKind,
        tick: u64,
        expires_at: Option<u64>,
    ) -> bool {
        if self.current.is_some() {
            return false;
        }
        self.current = Some(MentalState {
            kind,
            started_tick: tick,
            expires_at,
        });
        true
    }

    /// Ends the state if the given kind is the active one.
    pub fn end(&mut self, kind: MentalStateKind) {
        if self.is(kind) {
            self.current = None;
        }
    }

    /// Clears whatever state is active.
    pub fn clear(&mut self) {
        self.current = None;
    }
}
