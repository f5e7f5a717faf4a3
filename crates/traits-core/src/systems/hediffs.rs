//! Status-Effect Upkeep
//!
//! Natural severity decay on the fixed cadence, floor removal, the
//! berserker ire/rage machinery, boredom dozes, and mood memory expiry.

use bevy_ecs::prelude::*;

use traits_events::EventKind;

use crate::components::hediff::{HediffKind, HediffSet};
use crate::components::pawn::{Health, Mood};
use crate::engine::{queries, EcsHost};
use crate::events::push_event;
use crate::SimulationState;

/// Fixed decay cadence, one in-simulation second.
pub const DECAY_INTERVAL: u64 = 60;

/// Kinds that lose severity on their own. Ire decay is owned by the
/// berserker rule and isn't in this list.
const NATURAL_DECAY_KINDS: [HediffKind; 3] = [
    HediffKind::Bored,
    HediffKind::AlcoholHigh,
    HediffKind::BerserkerRage,
];

pub fn tick_hediffs(world: &mut World) {
    let tick = world.resource::<SimulationState>().current_tick;
    let rules = world.resource::<crate::Behaviors>().clone();

    for (entity, id) in queries::collect_pawns(world) {
        if world.get::<Health>(entity).map_or(true, |h| h.dead) {
            continue;
        }

        if let Some(mut mood) = world.get_mut::<Mood>(entity) {
            mood.expire(tick);
        }

        if queries::is_interval_tick(tick, id, DECAY_INTERVAL) {
            if let Some(mut set) = world.get_mut::<HediffSet>(entity) {
                for kind in NATURAL_DECAY_KINDS {
                    let Some(hediff) = set.get_mut(kind) else {
                        continue;
                    };
                    hediff.adjust_severity(-kind.natural_decay());
                    if hediff.at_floor() && kind.vanishes_at_floor() {
                        set.remove(kind);
                    }
                }
            }

            // A stupefied pawn may doze off where it stands.
            let dozed = {
                let mut host = EcsHost::new(world);
                rules.boring.doze_tick(&mut host, id)
            };
            if dozed {
                push_event(world, EventKind::DozedOff, entity, None, None, None);
            }
        }

        // Berserker machinery checks its own cadence.
        let drained = {
            let mut host = EcsHost::new(world);
            rules.berserker.ire_tick(&mut host, id)
        };
        if drained {
            push_event(
                world,
                EventKind::RageEnded,
                entity,
                None,
                None,
                Some("ire drained".to_string()),
            );
        }

        let desynced = {
            let mut host = EcsHost::new(world);
            rules.berserker.rage_tick(&mut host, id)
        };
        if desynced {
            push_event(
                world,
                EventKind::RageEnded,
                entity,
                None,
                None,
                Some("state interrupted".to_string()),
            );
        }
    }
}
