//! Damage System
//!
//! Drains the damage queue and applies each event: stagger/stun (with the
//! juggernaut override), health loss, downed/death transitions, and the
//! post-damage behavior hooks (hurt-animal remorse, berserker ire).

use bevy_ecs::prelude::*;

use traits_events::EventKind;

use crate::behaviors::IreResponse;
use crate::components::job::CurrentJob;
use crate::components::mental_state::{MentalStateKind, MentalStateSlot};
use crate::components::pawn::{Drafted, Health, Mobility, PawnId};
use crate::config::Config;
use crate::engine::{EcsHost, PawnIndex};
use crate::events::push_event;
use crate::host::{DamageInfo, DamageKind};
use crate::SimulationState;

/// Ticks of stun per point of stun damage.
const STUN_TICKS_PER_POINT: f32 = 6.0;

/// A queued damage event.
#[derive(Debug, Clone, Copy)]
pub struct DamageEvent {
    pub victim: PawnId,
    pub info: DamageInfo,
}

/// Pending damage, applied once per tick by [`apply_damage`].
#[derive(Resource, Default)]
pub struct DamageQueue {
    events: Vec<DamageEvent>,
}

impl DamageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: DamageEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<DamageEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

pub fn apply_damage(world: &mut World) {
    let events = world.resource_mut::<DamageQueue>().drain();
    if events.is_empty() {
        return;
    }
    let rules = world.resource::<crate::Behaviors>().clone();
    let combat = world.resource::<Config>().combat.clone();

    for event in events {
        let Some(victim) = world.resource::<PawnIndex>().entity(event.victim) else {
            continue;
        };
        if world.get::<Health>(victim).map_or(true, |h| h.dead) {
            continue;
        }
        let tick = world.resource::<SimulationState>().current_tick;
        let instigator_entity = event
            .info
            .instigator
            .and_then(|id| world.resource::<PawnIndex>().entity(id));

        // Stun damage wounds nothing; it just locks the pawn up.
        if event.info.kind == DamageKind::Stun {
            let base = (event.info.amount * STUN_TICKS_PER_POINT) as u32;
            let host = EcsHost::new(world);
            let (ticks, report) = rules.juggernaut.stun_ticks(&host, event.victim, base);
            if let Some(mut mobility) = world.get_mut::<Mobility>(victim) {
                mobility.staggered_until = mobility.staggered_until.max(tick + u64::from(ticks));
            }
            if report {
                push_event(
                    world,
                    EventKind::DamageTaken,
                    victim,
                    instigator_entity,
                    Some(event.info.amount),
                    Some(event.info.kind.label().to_string()),
                );
            }
            continue;
        }

        // Stagger, unless the victim shrugs it off.
        let stagger = {
            let host = EcsHost::new(world);
            rules
                .juggernaut
                .stagger_ticks(&host, event.victim, combat.stagger_ticks)
        };
        if let Some(mut mobility) = world.get_mut::<Mobility>(victim) {
            mobility.staggered_until = mobility.staggered_until.max(tick + u64::from(stagger));
        }

        let (newly_downed, died) = match world.get_mut::<Health>(victim) {
            Some(mut health) => health.apply_damage(event.info.amount, combat.downed_fraction),
            None => continue,
        };

        push_event(
            world,
            EventKind::DamageTaken,
            victim,
            instigator_entity,
            Some(event.info.amount),
            Some(event.info.kind.label().to_string()),
        );

        if newly_downed || died {
            // Incapacitation interrupts whatever the pawn was doing. The
            // berserker rage hediff is left for the desync check to reap.
            if let Some(mut job) = world.get_mut::<CurrentJob>(victim) {
                job.clear();
            }
            if let Some(mut slot) = world.get_mut::<MentalStateSlot>(victim) {
                slot.clear();
            }
            if died {
                if let Some(mut drafted) = world.get_mut::<Drafted>(victim) {
                    drafted.0 = false;
                }
            }
            push_event(
                world,
                if died { EventKind::Died } else { EventKind::Downed },
                victim,
                instigator_entity,
                None,
                None,
            );
        }

        // Post-damage behavior hooks.
        let remorse = {
            let mut host = EcsHost::new(world);
            rules
                .animal_friend
                .on_damage(&mut host, event.victim, &event.info)
        };
        if remorse {
            if let Some(instigator) = instigator_entity {
                push_event(
                    world,
                    EventKind::HurtAnimalRemorse,
                    instigator,
                    Some(victim),
                    None,
                    None,
                );
            }
        }

        if !died {
            let was_berserking = world
                .get::<MentalStateSlot>(victim)
                .is_some_and(|s| s.is(MentalStateKind::Berserking));
            let response = {
                let mut host = EcsHost::new(world);
                rules.berserker.on_damage(&mut host, event.victim, &event.info)
            };
            match response {
                IreResponse::RageStarted => {
                    push_event(world, EventKind::RageStarted, victim, None, None, None);
                }
                IreResponse::TraitLost => {
                    // The status values are gone; drop the orphaned state
                    // along with them.
                    if let Some(mut slot) = world.get_mut::<MentalStateSlot>(victim) {
                        slot.end(MentalStateKind::Berserking);
                    }
                    if was_berserking {
                        push_event(
                            world,
                            EventKind::RageEnded,
                            victim,
                            None,
                            None,
                            Some("trait removed".to_string()),
                        );
                    }
                }
                IreResponse::RageRefused
                | IreResponse::IreRose { .. }
                | IreResponse::NotApplicable => {}
            }
        }
    }
}
