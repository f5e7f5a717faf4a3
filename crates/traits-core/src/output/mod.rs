//! Snapshot Output
//!
//! Builds world snapshots from the ECS state and writes them as JSON.

use bevy_ecs::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use traits_events::{DoorSnapshot, HediffSnapshot, PawnSnapshot, SimTime, Snapshot};

use crate::components::hediff::HediffSet;
use crate::components::map::Map;
use crate::components::mental_state::MentalStateSlot;
use crate::components::pawn::{
    Drafted, FactionKind, Health, Mood, Pawn, PawnId, PawnKind, PawnName, Position, TraitSet,
};
use crate::SimulationState;

/// Captures the current world state.
pub fn generate_snapshot(world: &World, label: &str) -> Snapshot {
    let tick = world.resource::<SimulationState>().current_tick;

    let mut pawns: Vec<PawnSnapshot> = world
        .iter_entities()
        .filter(|e| e.contains::<Pawn>())
        .filter_map(|e| {
            let id = e.get::<PawnId>()?;
            let health = e.get::<Health>()?;
            let position = e.get::<Position>()?.0;
            Some(PawnSnapshot {
                pawn_id: id.0,
                name: e.get::<PawnName>().map_or_else(String::new, |n| n.0.clone()),
                faction: e
                    .get::<FactionKind>()
                    .map_or("wildlife", |f| f.label())
                    .to_string(),
                kind: e
                    .get::<PawnKind>()
                    .copied()
                    .unwrap_or_default()
                    .label()
                    .to_string(),
                position: (position.x, position.y),
                health: health.current,
                max_health: health.core_max,
                downed: health.downed,
                dead: health.dead,
                drafted: e.get::<Drafted>().is_some_and(|d| d.0),
                traits: e
                    .get::<TraitSet>()
                    .map(|t| t.iter().map(|k| k.label().to_string()).collect())
                    .unwrap_or_default(),
                hediffs: e
                    .get::<HediffSet>()
                    .map(|set| {
                        set.iter()
                            .map(|h| HediffSnapshot {
                                kind: h.kind.label().to_string(),
                                severity: h.severity(),
                                stage: h.stage_label().to_string(),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
                mental_state: e
                    .get::<MentalStateSlot>()
                    .and_then(|s| s.current_kind())
                    .map(|k| k.label().to_string()),
                mood_offset: e.get::<Mood>().map_or(0.0, |m| m.offset()),
            })
        })
        .collect();
    pawns.sort_by_key(|p| p.pawn_id);

    let (doors, filth_total) = world.get_resource::<Map>().map_or_else(
        || (Vec::new(), 0.0),
        |map| {
            let doors = map
                .doors
                .iter()
                .map(|d| DoorSnapshot {
                    position: (d.position.x, d.position.y),
                    open: d.open,
                    held_open: d.held_open,
                })
                .collect();
            (doors, map.total_filth())
        },
    );

    Snapshot {
        tick,
        time: SimTime::new(tick),
        label: label.to_string(),
        pawns,
        doors,
        filth_total,
    }
}

/// Writes a snapshot under `dir/snapshots/` named by its tick.
pub fn write_snapshot(dir: &Path, snapshot: &Snapshot) -> io::Result<PathBuf> {
    let snapshots = dir.join("snapshots");
    fs::create_dir_all(&snapshots)?;
    let path = snapshots.join(format!("snapshot_{:06}.json", snapshot.tick));
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Writes the rolling `current_state.json` in `dir`.
pub fn write_current_state(dir: &Path, snapshot: &Snapshot) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(dir.join("current_state.json"), json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::hediff::HediffKind;
    use crate::components::pawn::TraitKind;
    use crate::setup::{spawn_test_pawn, test_world};

    #[test]
    fn test_snapshot_captures_pawn_state() {
        let mut world = test_world();
        let pawn = spawn_test_pawn(&mut world, |p| {
            p.traits = vec![TraitKind::Berserker];
        });
        world
            .get_mut::<HediffSet>(pawn)
            .unwrap()
            .attach(HediffKind::BerserkerIre, 0.8);

        let snapshot = generate_snapshot(&world, "test");
        assert_eq!(snapshot.pawns.len(), 1);
        let p = &snapshot.pawns[0];
        assert_eq!(p.traits, vec!["berserker".to_string()]);
        assert_eq!(p.hediffs.len(), 1);
        assert_eq!(p.hediffs[0].stage, "boiling");
        assert_eq!(snapshot.doors.len(), 1);
    }

    #[test]
    fn test_snapshot_roundtrips_through_json() {
        let mut world = test_world();
        spawn_test_pawn(&mut world, |_| {});
        let snapshot = generate_snapshot(&world, "test");
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
