//! Jobs
//!
//! Job assignment per AI situation — the berserk melee override while
//! raging, standard combat for drafted colonists and raiders, hunts for
//! predators, wandering for everyone else — and job execution: movement
//! (doors, doormats, dirt) and melee resolution with the drunken-master
//! stat offsets.

use bevy_ecs::prelude::*;
use rand::Rng;

use traits_events::EventKind;

use crate::components::hediff::{HediffKind, HediffSet};
use crate::components::job::{CurrentJob, Job, JobKind};
use crate::components::map::Map;
use crate::components::mental_state::{MentalStateKind, MentalStateSlot};
use crate::components::pawn::{
    BodySize, Drafted, FactionKind, Health, Inventory, Mobility, PawnId, PawnKind, Position,
    Skills, TrackedDirt, TraitKind,
};
use crate::config::Config;
use crate::engine::{queries, EcsHost, PawnIndex};
use crate::events::push_event;
use crate::host::{DamageInfo, DamageKind, Stat, TargetPolicy};
use crate::systems::damage::{DamageEvent, DamageQueue};
use crate::systems::doors;
use crate::{SimRng, SimulationState};

/// Melee swings per pawn come this many ticks apart.
const MELEE_COOLDOWN: u64 = 60;

/// Raiders break and flee below this health fraction.
const RAIDER_FLEE_FRACTION: f32 = 0.35;

/// How long a raider's panic lasts.
const PANIC_TICKS: u64 = 900;

/// Predators look for prey within this range.
const HUNT_RADIUS: f32 = 30.0;

fn faction(world: &World, entity: Entity) -> Option<FactionKind> {
    world.get::<FactionKind>(entity).copied()
}

fn standing(world: &World, entity: Entity) -> bool {
    world.get::<Health>(entity).is_some_and(|h| h.is_standing())
}

/// Whether the job's target remains attackable.
fn target_valid(world: &World, job: &Job) -> bool {
    let Some(target_id) = job.target else {
        return true;
    };
    let Some(target) = world.resource::<PawnIndex>().entity(target_id) else {
        return false;
    };
    let Some(health) = world.get::<Health>(target) else {
        return false;
    };
    if health.dead {
        return false;
    }
    if health.downed && job.kind == JobKind::MeleeAttack && !job.allow_downed_target {
        return false;
    }
    true
}

pub fn assign_jobs(world: &mut World) {
    let tick = world.resource::<SimulationState>().current_tick;
    let rules = world.resource::<crate::Behaviors>().clone();
    let combat = world.resource::<Config>().combat.clone();

    for (entity, id) in queries::collect_pawns(world) {
        if !standing(world, entity) {
            if let Some(mut job) = world.get_mut::<CurrentJob>(entity) {
                job.clear();
            }
            continue;
        }

        // Validate and expire the current job.
        if let Some(job) = world.get::<CurrentJob>(entity).and_then(|c| c.job) {
            let invalid = job.kind == JobKind::MeleeAttack && !target_valid(world, &job);
            let expired = job.expired(tick)
                && (!job.expire_requires_enemies_nearby
                    || queries::hostiles_nearby(world, entity, combat.target_acquire_radius));
            if invalid || expired {
                if let Some(mut current) = world.get_mut::<CurrentJob>(entity) {
                    current.clear();
                }
            }
        }
        if world
            .get::<CurrentJob>(entity)
            .is_some_and(|c| c.job.is_some())
        {
            continue;
        }

        let state = world
            .get::<MentalStateSlot>(entity)
            .and_then(|s| s.current_kind());
        let job = match state {
            Some(MentalStateKind::Dozing) => Job::wait(),
            Some(MentalStateKind::Panic) => flee_job(world, entity),
            Some(MentalStateKind::Berserking) => {
                let mut host = EcsHost::new(world);
                rules
                    .berserker
                    .combat_job(&mut host, id)
                    .unwrap_or_else(Job::wander)
            }
            None => default_job(world, entity, id, &rules, &combat, tick),
        };
        if let Some(mut current) = world.get_mut::<CurrentJob>(entity) {
            current.start(job, tick);
        }
    }
}

/// Run away from the nearest standing hostile, or drift if none remain.
fn flee_job(world: &World, entity: Entity) -> Job {
    let policy = TargetPolicy {
        radius: 60.0,
        include_non_threats: false,
    };
    match queries::find_attack_target(world, entity, &policy) {
        Some(threat) => world
            .get::<PawnId>(threat)
            .map_or_else(Job::wander, |id| Job::flee_from(*id)),
        None => Job::wander(),
    }
}

/// Job selection for pawns under no forced behavior.
fn default_job(
    world: &mut World,
    entity: Entity,
    id: PawnId,
    rules: &crate::Behaviors,
    combat: &crate::config::CombatConfig,
    tick: u64,
) -> Job {
    let kind = world.get::<PawnKind>(entity).copied().unwrap_or_default();
    let side = faction(world, entity);

    if kind.is_animal() {
        return animal_job(world, entity, side);
    }

    match side {
        Some(FactionKind::Colony) => {
            let drafted = world.get::<Drafted>(entity).is_some_and(|d| d.0);
            if !drafted {
                return Job::wander();
            }
            if queries::hostiles_nearby(world, entity, combat.target_acquire_radius) {
                drink_for_courage(world, entity, id, rules);
            }
            let policy = TargetPolicy {
                radius: combat.target_acquire_radius,
                include_non_threats: false,
            };
            match queries::find_attack_target(world, entity, &policy) {
                Some(target) => world
                    .get::<PawnId>(target)
                    .map_or_else(Job::wait, |t| Job::melee_attack(*t)),
                // Stand ready at post.
                None => Job::wait(),
            }
        }
        Some(FactionKind::Raiders) => {
            let hurt = world
                .get::<Health>(entity)
                .is_some_and(|h| h.current < h.core_max * RAIDER_FLEE_FRACTION);
            if hurt {
                let started = world
                    .get_mut::<MentalStateSlot>(entity)
                    .is_some_and(|mut s| {
                        s.try_start(MentalStateKind::Panic, tick, Some(tick + PANIC_TICKS))
                    });
                if started {
                    return flee_job(world, entity);
                }
            }
            let policy = TargetPolicy {
                radius: combat.target_acquire_radius,
                include_non_threats: false,
            };
            match queries::find_attack_target(world, entity, &policy) {
                Some(target) => world
                    .get::<PawnId>(target)
                    .map_or_else(Job::wander, |t| Job::melee_attack(*t)),
                None => Job::wander(),
            }
        }
        _ => Job::wander(),
    }
}

/// Wildlife: big animals hunt smaller ones; the rest drift around.
/// Raider war beasts fight like their handlers.
fn animal_job(world: &World, entity: Entity, side: Option<FactionKind>) -> Job {
    if side == Some(FactionKind::Raiders) {
        let policy = TargetPolicy {
            radius: 40.0,
            include_non_threats: false,
        };
        if let Some(target) = queries::find_attack_target(world, entity, &policy) {
            if let Some(t) = world.get::<PawnId>(target) {
                return Job::melee_attack(*t);
            }
        }
        return Job::wander();
    }

    let my_size = world.get::<BodySize>(entity).map_or(1.0, |b| b.0);
    if my_size < 1.0 {
        return Job::wander();
    }
    // Prey: the nearest strictly smaller animal, unless the animal-friend
    // rule vetoes the pairing.
    let rules = world.resource::<crate::Behaviors>();
    let prey = queries::pawns_in_radius(world, entity, HUNT_RADIUS)
        .into_iter()
        .filter(|&p| queries::is_animal(world, p))
        .filter(|&p| world.get::<BodySize>(p).map_or(false, |b| b.0 < my_size))
        .find(|&p| {
            !rules.animal_friend.pacifies(
                queries::is_animal(world, entity),
                queries::has_trait(world, entity, TraitKind::AnimalFriend),
                true,
                queries::has_trait(world, p, TraitKind::AnimalFriend),
            )
        });
    match prey {
        // Hunts don't spare the downed.
        Some(p) => world
            .get::<PawnId>(p)
            .map_or_else(Job::wander, |t| Job::melee_attack(*t).allowing_downed_target()),
        None => Job::wander(),
    }
}

/// A drafted Drunken Master knocks one back before the fighting starts.
fn drink_for_courage(world: &mut World, entity: Entity, id: PawnId, rules: &crate::Behaviors) {
    let already_buzzed = world
        .get::<HediffSet>(entity)
        .is_some_and(|set| set.has(HediffKind::AlcoholHigh));
    if already_buzzed {
        return;
    }
    let drink = {
        let host = EcsHost::new(world);
        rules.drunken_master.combat_drug(&host, id)
    };
    let Some(item) = drink else {
        return;
    };
    let taken = world
        .get_mut::<Inventory>(entity)
        .is_some_and(|mut inv| inv.take_one(item));
    if !taken {
        return;
    }
    let dose = rules.drunken_master.dose_severity();
    if let Some(mut set) = world.get_mut::<HediffSet>(entity) {
        set.attach(HediffKind::AlcoholHigh, dose);
    }
    push_event(
        world,
        EventKind::DrankForCourage,
        entity,
        None,
        None,
        Some(item.label().to_string()),
    );
}

pub fn run_jobs(world: &mut World) {
    let tick = world.resource::<SimulationState>().current_tick;

    for (entity, id) in queries::collect_pawns(world) {
        if !standing(world, entity) {
            continue;
        }
        let Some(job) = world.get::<CurrentJob>(entity).and_then(|c| c.job) else {
            continue;
        };

        match job.kind {
            JobKind::Wait => {}
            JobKind::Wander => {
                if can_move(world, entity, tick) {
                    let (dx, dy) = {
                        let mut rng = world.resource_mut::<SimRng>();
                        (rng.0.gen_range(-1..=1), rng.0.gen_range(-1..=1))
                    };
                    let Some(origin) = world.get::<Position>(entity).map(|p| p.0) else {
                        continue;
                    };
                    let dest =
                        crate::components::map::Coord::new(origin.x + dx, origin.y + dy);
                    step_to(world, entity, dest);
                    // An amble, not a march.
                    bump_move_cooldown(world, entity, tick, 3);
                }
            }
            JobKind::FleeFrom => {
                let Some(threat) = job
                    .target
                    .and_then(|t| world.resource::<PawnIndex>().entity(t))
                else {
                    clear_job(world, entity);
                    continue;
                };
                if can_move(world, entity, tick) {
                    let (Some(origin), Some(from)) = (
                        world.get::<Position>(entity).map(|p| p.0),
                        world.get::<Position>(threat).map(|p| p.0),
                    ) else {
                        continue;
                    };
                    step_to(world, entity, origin.step_away_from(from));
                    bump_move_cooldown(world, entity, tick, 1);
                }
            }
            JobKind::MeleeAttack => {
                if !target_valid(world, &job) {
                    clear_job(world, entity);
                    continue;
                }
                let Some(target) = job
                    .target
                    .and_then(|t| world.resource::<PawnIndex>().entity(t))
                else {
                    clear_job(world, entity);
                    continue;
                };
                let (Some(origin), Some(target_pos)) = (
                    world.get::<Position>(entity).map(|p| p.0),
                    world.get::<Position>(target).map(|p| p.0),
                ) else {
                    continue;
                };
                if origin.adjacent_to(target_pos) {
                    if tick
                        >= world
                            .get::<Mobility>(entity)
                            .map_or(0, |m| m.next_move_tick)
                        && can_act(world, entity, tick)
                    {
                        swing(world, entity, id, target);
                        if let Some(mut mobility) = world.get_mut::<Mobility>(entity) {
                            mobility.next_move_tick = tick + MELEE_COOLDOWN;
                        }
                    }
                } else if can_move(world, entity, tick) {
                    step_to(world, entity, origin.step_toward(target_pos));
                    bump_move_cooldown(world, entity, tick, 1);
                }
            }
        }
    }
}

fn clear_job(world: &mut World, entity: Entity) {
    if let Some(mut current) = world.get_mut::<CurrentJob>(entity) {
        current.clear();
    }
}

fn can_move(world: &World, entity: Entity, tick: u64) -> bool {
    world
        .get::<Mobility>(entity)
        .is_some_and(|m| m.can_move(tick))
}

fn can_act(world: &World, entity: Entity, tick: u64) -> bool {
    world
        .get::<Mobility>(entity)
        .is_some_and(|m| tick >= m.staggered_until)
}

fn bump_move_cooldown(world: &mut World, entity: Entity, tick: u64, pace_factor: u64) {
    if let Some(mut mobility) = world.get_mut::<Mobility>(entity) {
        mobility.next_move_tick = tick + mobility.ticks_per_cell * pace_factor;
    }
}

/// Moves one cell, going through the door/doormat/dirt bookkeeping.
fn step_to(world: &mut World, entity: Entity, dest: crate::components::map::Coord) {
    let rules = world.resource::<crate::Behaviors>().clone();
    let cfg = world.resource::<Config>().clone();
    let is_satan = queries::has_trait(world, entity, TraitKind::SatanSpawn);
    let is_slob = queries::has_trait(world, entity, TraitKind::Slob);

    let Some(mut map) = world.remove_resource::<Map>() else {
        if let Some(mut pos) = world.get_mut::<Position>(entity) {
            pos.0 = dest;
        }
        return;
    };
    let dest = map.clamp(dest);
    let mut dirt = world.get::<TrackedDirt>(entity).map_or(0.0, |d| d.0);
    let jammed = doors::enter_cell(
        &mut map,
        &rules,
        is_satan,
        is_slob,
        &mut dirt,
        dest,
        &cfg.doors,
        &cfg.filth,
    );
    if let Some(mut tracked) = world.get_mut::<TrackedDirt>(entity) {
        tracked.0 = dirt;
    }
    if let Some(mut pos) = world.get_mut::<Position>(entity) {
        pos.0 = dest;
    }
    world.insert_resource(map);
    if jammed {
        push_event(
            world,
            EventKind::DoorJammed,
            entity,
            None,
            None,
            Some(format!("({}, {})", dest.x, dest.y)),
        );
    }
}

/// One melee swing: hit roll against dodge, then queued damage.
fn swing(world: &mut World, attacker: Entity, attacker_id: PawnId, target: Entity) {
    let rules = world.resource::<crate::Behaviors>().clone();
    let combat = world.resource::<Config>().combat.clone();
    let Some(target_id) = world.get::<PawnId>(target).copied() else {
        return;
    };

    // Violence between an animal friend and an animal fails validation,
    // however the job came about.
    let blocked = {
        let host = EcsHost::new(world);
        rules
            .animal_friend
            .blocks_violence(&host, attacker_id, target_id)
    };
    if blocked {
        clear_job(world, attacker);
        return;
    }

    let melee_level = world
        .get::<Skills>(attacker)
        .map_or(0, |s| s.level(crate::SkillKind::Melee));
    let (hit_offset, dodge_offset) = {
        let host = EcsHost::new(world);
        (
            rules
                .drunken_master
                .stat_offset(&host, attacker_id, Stat::MeleeHitChance),
            rules
                .drunken_master
                .stat_offset(&host, target_id, Stat::MeleeDodgeChance),
        )
    };
    let hit = combat.base_melee_hit + hit_offset + melee_level as f32 * 0.005;
    let dodge = if standing(world, target) {
        combat.base_melee_dodge + dodge_offset
    } else {
        0.0
    };
    let p = (hit - dodge).clamp(0.05, 0.95);

    let (landed, amount) = {
        let mut rng = world.resource_mut::<SimRng>();
        let landed = rng.0.gen_bool(f64::from(p));
        let amount = rng
            .0
            .gen_range(combat.melee_damage_min..=combat.melee_damage_max);
        (landed, amount)
    };
    if !landed {
        return;
    }
    let kind = if queries::is_animal(world, attacker) {
        DamageKind::Bite
    } else {
        DamageKind::Cut
    };
    world.resource_mut::<DamageQueue>().push(DamageEvent {
        victim: target_id,
        info: DamageInfo {
            amount,
            kind,
            instigator: Some(attacker_id),
        },
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::map::Coord;
    use crate::setup::{spawn_test_pawn, test_world};

    #[test]
    fn test_berserking_pawn_gets_downed_enemy_job() {
        let mut world = test_world();
        let berserker = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Colony;
            p.traits = vec![TraitKind::Berserker];
        });
        let raider = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Raiders;
            p.position = Coord::new(5, 0);
            p.downed = true;
        });
        world
            .get_mut::<MentalStateSlot>(berserker)
            .unwrap()
            .try_start(MentalStateKind::Berserking, 0, None);

        assign_jobs(&mut world);

        let job = world.get::<CurrentJob>(berserker).unwrap().job.unwrap();
        assert_eq!(job.kind, JobKind::MeleeAttack);
        assert_eq!(
            job.target,
            Some(*world.get::<PawnId>(raider).unwrap())
        );
        assert!(job.allow_downed_target);
        assert!((360..=480).contains(&job.expiry_interval.unwrap()));
    }

    #[test]
    fn test_drafted_colonist_ignores_downed_enemy() {
        let mut world = test_world();
        let colonist = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Colony;
            p.drafted = true;
        });
        let _downed_raider = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Raiders;
            p.position = Coord::new(5, 0);
            p.downed = true;
        });

        assign_jobs(&mut world);

        let job = world.get::<CurrentJob>(colonist).unwrap().job.unwrap();
        assert_eq!(job.kind, JobKind::Wait, "standard policy skips the downed");
    }

    #[test]
    fn test_melee_attack_closes_distance_and_hits() {
        let mut world = test_world();
        let colonist = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Colony;
            p.drafted = true;
        });
        let raider = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Raiders;
            p.position = Coord::new(4, 0);
        });

        // March the colonist in and let it swing until damage lands.
        let mut damaged = false;
        for tick in 0..600 {
            world.resource_mut::<SimulationState>().current_tick = tick;
            assign_jobs(&mut world);
            run_jobs(&mut world);
            crate::systems::damage::apply_damage(&mut world);
            if world.get::<Health>(raider).unwrap().current < 100.0 {
                damaged = true;
                break;
            }
        }
        assert!(damaged, "melee pursuit should land a hit within 600 ticks");
        assert!(world.get::<Health>(colonist).unwrap().current <= 100.0);
    }

    #[test]
    fn test_animal_friend_cannot_swing_at_animal() {
        let mut world = test_world();
        let friend = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Colony;
            p.traits = vec![TraitKind::AnimalFriend];
        });
        let hound = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Raiders;
            p.kind = PawnKind::Animal;
            p.position = Coord::new(1, 0);
        });
        // A melee job at the adjacent war hound, however it came about,
        // fails validation instead of landing a hit.
        let hound_id = *world.get::<PawnId>(hound).unwrap();
        world
            .get_mut::<CurrentJob>(friend)
            .unwrap()
            .start(Job::melee_attack(hound_id), 0);

        run_jobs(&mut world);
        crate::systems::damage::apply_damage(&mut world);

        let health = world.get::<Health>(hound).unwrap();
        assert_eq!(health.current, health.core_max);
        assert!(world.get::<CurrentJob>(friend).unwrap().job.is_none());
    }

    #[test]
    fn test_expired_job_with_no_enemies_nearby_persists() {
        let mut world = test_world();
        let colonist = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Colony;
        });
        let raider_id = {
            let raider = spawn_test_pawn(&mut world, |p| {
                p.faction = FactionKind::Raiders;
                p.position = Coord::new(100, 100);
            });
            *world.get::<PawnId>(raider).unwrap()
        };

        // A melee job that expires only near enemies; the raider is far
        // outside the acquire radius, so expiry is deferred.
        let job = Job::melee_attack(raider_id)
            .with_expiry(10)
            .expiring_only_near_enemies();
        world
            .get_mut::<CurrentJob>(colonist)
            .unwrap()
            .start(job, 0);

        world.resource_mut::<SimulationState>().current_tick = 50;
        assign_jobs(&mut world);
        let job = world.get::<CurrentJob>(colonist).unwrap().job.unwrap();
        assert_eq!(job.kind, JobKind::MeleeAttack, "expiry needs enemies nearby");
    }
}
