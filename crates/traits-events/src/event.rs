//! Event Types
//!
//! Typed records for everything the simulation reports: combat, trait
//! behavior firings, social interactions, and scenario milestones. Events
//! serialize one-per-line as JSONL.

use serde::{Deserialize, Serialize};

/// Category of a simulation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A pawn took damage.
    DamageTaken,
    /// A pawn was incapacitated by its injuries.
    Downed,
    /// A pawn died.
    Died,
    /// A berserker entered the raging mental state.
    RageStarted,
    /// A berserker's rage ended (ire drained or cleared externally).
    RageEnded,
    /// A raging pawn insulted a nearby pawn.
    Taunt,
    /// A social interaction between two pawns.
    Interaction,
    /// A teacher passed skill experience to another pawn.
    SkillTaught,
    /// A pawn dozed off from accumulated boredom.
    DozedOff,
    /// A door was latched open and will not close on its own.
    DoorJammed,
    /// A pawn drank alcohol as a combat stimulant.
    DrankForCourage,
    /// An animal friend felt remorse for harming an animal.
    HurtAnimalRemorse,
    /// A hostile raid arrived on the map.
    RaidArrived,
    /// A caravan formed and its travel speed was computed.
    CaravanFormed,
}

impl EventKind {
    /// Human-readable label, matching the serialized name.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::DamageTaken => "damage_taken",
            EventKind::Downed => "downed",
            EventKind::Died => "died",
            EventKind::RageStarted => "rage_started",
            EventKind::RageEnded => "rage_ended",
            EventKind::Taunt => "taunt",
            EventKind::Interaction => "interaction",
            EventKind::SkillTaught => "skill_taught",
            EventKind::DozedOff => "dozed_off",
            EventKind::DoorJammed => "door_jammed",
            EventKind::DrankForCourage => "drank_for_courage",
            EventKind::HurtAnimalRemorse => "hurt_animal_remorse",
            EventKind::RaidArrived => "raid_arrived",
            EventKind::CaravanFormed => "caravan_formed",
        }
    }

    /// True for events worth surfacing in the per-tick progress report.
    pub fn is_notable(&self) -> bool {
        matches!(
            self,
            EventKind::RageStarted
                | EventKind::RageEnded
                | EventKind::Died
                | EventKind::RaidArrived
                | EventKind::CaravanFormed
        )
    }
}

/// Minimal identity snapshot of a pawn at event time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventActor {
    pub pawn_id: u64,
    pub name: String,
    pub faction: String,
}

impl EventActor {
    pub fn new(pawn_id: u64, name: impl Into<String>, faction: impl Into<String>) -> Self {
        Self {
            pawn_id,
            name: name.into(),
            faction: faction.into(),
        }
    }
}

/// A single simulation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Sequential id, e.g. `evt_00000042`.
    pub event_id: String,
    /// Simulation tick the event occurred on.
    pub tick: u64,
    pub kind: EventKind,
    pub actor: EventActor,
    /// Second party, when the event has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<EventActor>,
    /// Numeric payload (damage amount, XP granted, ticks per move).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f32>,
    /// Free-text detail (interaction kind, damage kind, skill name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Event {
    pub fn new(event_id: impl Into<String>, tick: u64, kind: EventKind, actor: EventActor) -> Self {
        Self {
            event_id: event_id.into(),
            tick,
            kind,
            actor,
            target: None,
            amount: None,
            detail: None,
        }
    }

    pub fn with_target(mut self, target: EventActor) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_amount(mut self, amount: f32) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Serializes the event to a single JSONL line.
    pub fn to_jsonl(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parses an event from a JSONL line.
    pub fn from_jsonl(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EventKind::RageStarted).unwrap();
        assert_eq!(json, r#""rage_started""#);
    }

    #[test]
    fn test_label_matches_serialized_name() {
        for kind in [
            EventKind::DamageTaken,
            EventKind::Taunt,
            EventKind::DrankForCourage,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json.trim_matches('"'), kind.label());
        }
    }

    #[test]
    fn test_event_jsonl_roundtrip() {
        let event = Event::new(
            "evt_00000001",
            600,
            EventKind::DamageTaken,
            EventActor::new(3, "Brakka", "colony"),
        )
        .with_target(EventActor::new(11, "Raider", "raiders"))
        .with_amount(12.5)
        .with_detail("cut");

        let line = event.to_jsonl().unwrap();
        let parsed = Event::from_jsonl(&line).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_optional_fields_omitted() {
        let event = Event::new(
            "evt_00000002",
            0,
            EventKind::RaidArrived,
            EventActor::new(20, "Raid leader", "raiders"),
        );
        let line = event.to_jsonl().unwrap();
        assert!(!line.contains("target"));
        assert!(!line.contains("amount"));
        assert!(!line.contains("detail"));
    }

    #[test]
    fn test_notable_events() {
        assert!(EventKind::RageStarted.is_notable());
        assert!(!EventKind::Interaction.is_notable());
    }
}
