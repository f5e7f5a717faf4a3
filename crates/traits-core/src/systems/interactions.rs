//! Social Interactions
//!
//! Periodic chitchat between idle pawns, plus the shared delivery path all
//! interactions go through — including berserker taunts — so the boring
//! and teacher hooks see every one of them.

use bevy_ecs::prelude::*;
use rand::Rng;

use traits_events::EventKind;

use crate::components::job::JobKind;
use crate::components::mental_state::MentalStateSlot;
use crate::components::pawn::{Drafted, Health, PawnKind};
use crate::config::Config;
use crate::engine::{queries, EcsHost};
use crate::events::push_event;
use crate::host::InteractionKind;
use crate::{SimRng, SimulationState};

/// Delivers one interaction: validates the recipient, applies the
/// anti-escalation rule, records the event, and runs the post-interaction
/// trait hooks. Returns false when the interaction couldn't happen.
pub fn deliver(
    world: &mut World,
    actor: Entity,
    recipient: Entity,
    kind: InteractionKind,
) -> bool {
    let receivable = if kind == InteractionKind::AnimalChat {
        queries::is_animal(world, recipient)
            && world
                .get::<Health>(recipient)
                .is_some_and(|h| h.is_standing())
    } else {
        queries::can_receive_interaction(world, recipient)
    };
    if !receivable {
        return false;
    }
    // Plain interactions don't reach hostile recipients; the enemy-insult
    // variant exists precisely to get past this without starting a fight.
    if queries::hostile(world, actor, recipient) && !kind.deliverable_to_hostile() {
        return false;
    }

    let (Some(actor_id), Some(recipient_id)) = (
        world.get::<crate::PawnId>(actor).copied(),
        world.get::<crate::PawnId>(recipient).copied(),
    ) else {
        return false;
    };

    // Taunts are reported separately by the rage machinery.
    if kind != InteractionKind::InsultEnemy {
        push_event(
            world,
            EventKind::Interaction,
            actor,
            Some(recipient),
            None,
            Some(kind.label().to_string()),
        );
    }

    let rules = world.resource::<crate::Behaviors>().clone();
    {
        let mut host = EcsHost::new(world);
        rules
            .boring
            .after_interaction(&mut host, actor_id, recipient_id, kind);
    }
    let lesson = {
        let mut host = EcsHost::new(world);
        rules
            .teacher
            .after_interaction(&mut host, actor_id, recipient_id, kind)
    };
    if let Some((skill, xp)) = lesson {
        push_event(
            world,
            EventKind::SkillTaught,
            actor,
            Some(recipient),
            Some(xp),
            Some(skill.label().to_string()),
        );
    }
    true
}

/// Idle pawns strike up conversations on their own cadence.
pub fn social_tick(world: &mut World) {
    let tick = world.resource::<SimulationState>().current_tick;
    let cfg = world.resource::<Config>().interaction.clone();

    for (entity, id) in queries::collect_pawns(world) {
        if !queries::is_interval_tick(tick, id, cfg.interval) {
            continue;
        }
        // Only idle, conscious humans socialize.
        let human = world
            .get::<PawnKind>(entity)
            .is_some_and(|k| !k.is_animal());
        let standing = world
            .get::<Health>(entity)
            .is_some_and(|h| h.is_standing());
        let free = world
            .get::<MentalStateSlot>(entity)
            .is_some_and(|s| s.current().is_none());
        let undrafted = world.get::<Drafted>(entity).is_some_and(|d| !d.0);
        let idle = world
            .get::<crate::CurrentJob>(entity)
            .and_then(|c| c.job)
            .map_or(true, |j| {
                matches!(j.kind, JobKind::Wander | JobKind::Wait)
            });
        if !(human && standing && free && undrafted && idle) {
            continue;
        }

        let roll: f32 = world.resource_mut::<SimRng>().0.gen();
        if roll >= cfg.chance {
            continue;
        }

        let candidates: Vec<Entity> = queries::pawns_in_radius(world, entity, cfg.radius)
            .into_iter()
            .filter(|&c| !queries::hostile(world, entity, c))
            .filter(|&c| {
                queries::can_receive_interaction(world, c)
                    || (queries::is_animal(world, c)
                        && world.get::<Health>(c).is_some_and(|h| h.is_standing()))
            })
            .collect();
        if candidates.is_empty() {
            continue;
        }

        let pick = world
            .resource_mut::<SimRng>()
            .0
            .gen_range(0..candidates.len());
        let target = candidates[pick];

        let kind = if queries::is_animal(world, target) {
            InteractionKind::AnimalChat
        } else {
            let r: f32 = world.resource_mut::<SimRng>().0.gen();
            if r < cfg.insult_chance {
                InteractionKind::Insult
            } else if r < cfg.insult_chance + 0.12 {
                InteractionKind::BuildRapport
            } else if r < cfg.insult_chance + 0.32 {
                InteractionKind::DeepTalk
            } else {
                InteractionKind::Chitchat
            }
        };
        deliver(world, entity, target, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::hediff::HediffKind;
    use crate::components::map::Coord;
    use crate::components::pawn::{FactionKind, SkillKind, TraitKind};
    use crate::setup::{spawn_test_pawn, test_world};

    #[test]
    fn test_plain_insult_refused_against_hostiles() {
        let mut world = test_world();
        let colonist = spawn_test_pawn(&mut world, |p| p.faction = FactionKind::Colony);
        let raider = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Raiders;
            p.position = Coord::new(1, 0);
        });

        assert!(!deliver(&mut world, colonist, raider, InteractionKind::Insult));
        assert!(deliver(
            &mut world,
            colonist,
            raider,
            InteractionKind::InsultEnemy
        ));
    }

    #[test]
    fn test_boring_hook_fires_on_delivery() {
        let mut world = test_world();
        let bore = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Colony;
            p.traits = vec![TraitKind::Boring];
        });
        let victim = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Colony;
            p.position = Coord::new(1, 0);
        });

        assert!(deliver(&mut world, bore, victim, InteractionKind::Chitchat));

        let severity = world
            .get::<crate::HediffSet>(victim)
            .unwrap()
            .severity(HediffKind::Bored);
        assert_eq!(severity, Some(0.15));
    }

    #[test]
    fn test_teacher_hook_logs_lesson() {
        let mut world = test_world();
        let mentor = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Colony;
            p.traits = vec![TraitKind::Teacher];
            p.skills = vec![(SkillKind::Melee, 10)];
        });
        let student = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Colony;
            p.position = Coord::new(1, 0);
        });

        // Teaching picks randomly; try enough times for a melee pick.
        let mut taught = false;
        for _ in 0..40 {
            deliver(&mut world, mentor, student, InteractionKind::Chitchat);
            let events = world.resource::<crate::events::TickEvents>();
            if events.events.iter().any(|e| e.kind == EventKind::SkillTaught) {
                taught = true;
                break;
            }
        }
        assert!(taught, "forty chitchats should land at least one lesson");
    }

    #[test]
    fn test_downed_recipient_refused() {
        let mut world = test_world();
        let colonist = spawn_test_pawn(&mut world, |p| p.faction = FactionKind::Colony);
        let downed = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Colony;
            p.position = Coord::new(1, 0);
            p.downed = true;
        });
        assert!(!deliver(
            &mut world,
            colonist,
            downed,
            InteractionKind::Chitchat
        ));
    }
}
