//! Mental-State Upkeep
//!
//! Expires timed states, clears states on incapacitated pawns, and runs
//! the berserker taunt cycle while the raging state is active.

use bevy_ecs::prelude::*;

use traits_events::EventKind;

use crate::components::mental_state::{MentalStateKind, MentalStateSlot};
use crate::components::pawn::Health;
use crate::engine::{queries, EcsHost, PawnIndex};
use crate::events::push_event;
use crate::SimulationState;

pub fn tick_mental_states(world: &mut World) {
    let tick = world.resource::<SimulationState>().current_tick;
    let rules = world.resource::<crate::Behaviors>().clone();

    for (entity, id) in queries::collect_pawns(world) {
        let Some(state) = world
            .get::<MentalStateSlot>(entity)
            .and_then(|s| s.current().copied())
        else {
            continue;
        };

        // Incapacitation ends any forced behavior.
        let standing = world
            .get::<Health>(entity)
            .is_some_and(|h| h.is_standing());
        if !standing {
            if let Some(mut slot) = world.get_mut::<MentalStateSlot>(entity) {
                slot.clear();
            }
            continue;
        }

        if let Some(expires_at) = state.expires_at {
            if tick >= expires_at {
                if let Some(mut slot) = world.get_mut::<MentalStateSlot>(entity) {
                    slot.clear();
                }
                continue;
            }
        }

        if state.kind == MentalStateKind::Berserking {
            let taunted = {
                let mut host = EcsHost::new(world);
                rules.berserker.taunt_tick(&mut host, id)
            };
            if let Some(target_id) = taunted {
                let target = world.resource::<PawnIndex>().entity(target_id);
                push_event(
                    world,
                    EventKind::Taunt,
                    entity,
                    target,
                    None,
                    Some(crate::host::InteractionKind::InsultEnemy.label().to_string()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::map::Coord;
    use crate::components::pawn::{FactionKind, PawnId, TraitKind};
    use crate::setup::{spawn_test_pawn, test_world};

    #[test]
    fn test_timed_state_expires() {
        let mut world = test_world();
        let pawn = spawn_test_pawn(&mut world, |_| {});
        world
            .get_mut::<MentalStateSlot>(pawn)
            .unwrap()
            .try_start(MentalStateKind::Dozing, 0, Some(100));

        world.resource_mut::<SimulationState>().current_tick = 99;
        tick_mental_states(&mut world);
        assert!(world
            .get::<MentalStateSlot>(pawn)
            .unwrap()
            .is(MentalStateKind::Dozing));

        world.resource_mut::<SimulationState>().current_tick = 100;
        tick_mental_states(&mut world);
        assert!(world
            .get::<MentalStateSlot>(pawn)
            .unwrap()
            .current()
            .is_none());
    }

    #[test]
    fn test_berserking_taunts_nearby_enemy() {
        let mut world = test_world();
        let berserker = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Colony;
            p.traits = vec![TraitKind::Berserker];
        });
        let raider = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Raiders;
            p.position = Coord::new(3, 0);
        });
        world
            .get_mut::<MentalStateSlot>(berserker)
            .unwrap()
            .try_start(MentalStateKind::Berserking, 0, None);

        // Find a tick on which the berserker's taunt cadence fires.
        let id = *world.get::<PawnId>(berserker).unwrap();
        let tick = (0..180)
            .find(|t| queries::is_interval_tick(*t, id, 180))
            .unwrap();
        world.resource_mut::<SimulationState>().current_tick = tick;

        tick_mental_states(&mut world);

        let events = world.resource::<crate::events::TickEvents>();
        let taunt = events
            .events
            .iter()
            .find(|e| e.kind == EventKind::Taunt)
            .expect("taunt should fire on cadence");
        assert_eq!(
            taunt.target.as_ref().map(|t| t.pawn_id),
            Some(world.get::<PawnId>(raider).unwrap().0)
        );
    }
}
