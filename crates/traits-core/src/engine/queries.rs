//! Shared World Queries
//!
//! Read-only helpers used by both the host adapter and the systems:
//! hostility (with the animal-friend override), radius scans, target
//! acquisition, and the fixed-cadence interval test.

use bevy_ecs::prelude::*;

use crate::behaviors::Behaviors;
use crate::components::hediff::{HediffKind, HediffSet};
use crate::components::mental_state::{MentalStateKind, MentalStateSlot};
use crate::components::pawn::{
    FactionKind, Health, Pawn, PawnId, PawnKind, Position, TraitKind, TraitSet,
};
use crate::host::TargetPolicy;

/// Pawn-offset fixed-cadence test.
pub fn is_interval_tick(tick: u64, pawn: PawnId, interval: u64) -> bool {
    (tick + pawn.interval_offset()) % interval == 0
}

/// Snapshot of all pawn entities and ids in id order, for exclusive
/// systems that need a stable iteration order while mutating the world.
pub fn collect_pawns(world: &mut World) -> Vec<(Entity, PawnId)> {
    let mut query = world.query_filtered::<(Entity, &PawnId), With<Pawn>>();
    let mut pawns: Vec<(Entity, PawnId)> = query.iter(world).map(|(e, id)| (e, *id)).collect();
    pawns.sort_by_key(|(_, id)| *id);
    pawns
}

pub fn is_animal(world: &World, entity: Entity) -> bool {
    world.get::<PawnKind>(entity).is_some_and(|k| k.is_animal())
}

pub fn has_trait(world: &World, entity: Entity, kind: TraitKind) -> bool {
    world.get::<TraitSet>(entity).is_some_and(|t| t.has(kind))
}

/// Hostility between two pawns: faction hostility, with the animal-friend
/// rule allowed to pacify animal/friend pairs.
pub fn hostile(world: &World, a: Entity, b: Entity) -> bool {
    let (Some(fa), Some(fb)) = (world.get::<FactionKind>(a), world.get::<FactionKind>(b)) else {
        return false;
    };
    if !fa.hostile_to(*fb) {
        return false;
    }
    let rules = world.resource::<Behaviors>();
    !rules.animal_friend.pacifies(
        is_animal(world, a),
        has_trait(world, a, TraitKind::AnimalFriend),
        is_animal(world, b),
        has_trait(world, b, TraitKind::AnimalFriend),
    )
}

/// All pawn entities paired with their ids and positions, skipping the
/// dead when asked.
fn pawn_positions(world: &World, include_dead: bool) -> Vec<(Entity, PawnId, Position)> {
    world
        .iter_entities()
        .filter(|e| e.contains::<Pawn>())
        .filter_map(|e| {
            let id = *e.get::<PawnId>()?;
            let pos = *e.get::<Position>()?;
            let health = e.get::<Health>()?;
            if !include_dead && health.dead {
                return None;
            }
            Some((e.id(), id, pos))
        })
        .collect()
}

/// Living pawns within `radius` cells of the given pawn, nearest first.
pub fn pawns_in_radius(world: &World, center: Entity, radius: f32) -> Vec<Entity> {
    let Some(origin) = world.get::<Position>(center).map(|p| p.0) else {
        return Vec::new();
    };
    let mut found: Vec<(f32, PawnId, Entity)> = pawn_positions(world, false)
        .into_iter()
        .filter(|(e, _, _)| *e != center)
        .map(|(e, id, pos)| (origin.distance_to(pos.0), id, e))
        .filter(|(d, _, _)| *d <= radius)
        .collect();
    found.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });
    found.into_iter().map(|(_, _, e)| e).collect()
}

/// Nearest valid combat target under the given policy. The standard
/// policy drops incapacitated targets; the berserk override keeps them.
pub fn find_attack_target(world: &World, pawn: Entity, policy: &TargetPolicy) -> Option<Entity> {
    let origin = world.get::<Position>(pawn).map(|p| p.0)?;
    pawn_positions(world, false)
        .into_iter()
        .filter(|(e, _, _)| *e != pawn)
        .filter(|(e, _, _)| {
            policy.include_non_threats
                || world.get::<Health>(*e).is_some_and(|h| h.is_standing())
        })
        .map(|(e, id, pos)| (origin.distance_to(pos.0), id, e))
        .filter(|(d, _, _)| *d <= policy.radius)
        .filter(|(_, _, e)| hostile(world, pawn, *e))
        .min_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        })
        .map(|(_, _, e)| e)
}

/// Whether any hostile pawn is within the given radius.
pub fn hostiles_nearby(world: &World, pawn: Entity, radius: f32) -> bool {
    pawns_in_radius(world, pawn, radius)
        .into_iter()
        .any(|other| hostile(world, pawn, other))
}

/// Whether a pawn can receive a random social interaction: a conscious,
/// standing human that isn't dozing.
pub fn can_receive_interaction(world: &World, pawn: Entity) -> bool {
    let standing = world.get::<Health>(pawn).is_some_and(|h| h.is_standing());
    let human = !is_animal(world, pawn);
    let awake = !world
        .get::<MentalStateSlot>(pawn)
        .is_some_and(|s| s.is(MentalStateKind::Dozing));
    standing && human && awake
}

/// Whether a melee engagement option exists: the attacker is standing.
pub fn has_melee_option(world: &World, pawn: Entity) -> bool {
    world.get::<Health>(pawn).is_some_and(|h| h.is_standing())
}

/// Stage index of a hediff on a pawn, if attached.
pub fn stage_index(world: &World, pawn: Entity, kind: HediffKind) -> Option<usize> {
    world
        .get::<HediffSet>(pawn)?
        .get(kind)
        .map(|h| h.stage_index())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::map::Coord;
    use crate::config::Config;
    use crate::setup::spawn_test_pawn;

    fn test_world() -> World {
        let mut world = World::new();
        world.insert_resource(Behaviors::from_config(&Config::default()));
        world.insert_resource(crate::engine::PawnIndex::new());
        world
    }

    #[test]
    fn test_animal_friend_pacifies_hostility() {
        let mut world = test_world();
        let friend = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Colony;
            p.traits = vec![TraitKind::AnimalFriend];
        });
        let war_hound = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Raiders;
            p.kind = PawnKind::Animal;
        });
        let raider = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Raiders;
        });

        assert!(!hostile(&world, friend, war_hound));
        assert!(!hostile(&world, war_hound, friend));
        assert!(hostile(&world, friend, raider));
        assert!(hostile(&world, raider, friend));
    }

    #[test]
    fn test_standard_policy_skips_downed_targets() {
        let mut world = test_world();
        let colonist = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Colony;
        });
        let raider = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Raiders;
            p.position = Coord::new(3, 0);
            p.downed = true;
        });

        let standard = TargetPolicy {
            radius: 40.0,
            include_non_threats: false,
        };
        assert_eq!(find_attack_target(&world, colonist, &standard), None);

        let berserk = TargetPolicy {
            radius: 40.0,
            include_non_threats: true,
        };
        assert_eq!(find_attack_target(&world, colonist, &berserk), Some(raider));
    }

    #[test]
    fn test_nearest_target_wins() {
        let mut world = test_world();
        let colonist = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Colony;
        });
        let _far = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Raiders;
            p.position = Coord::new(9, 0);
        });
        let near = spawn_test_pawn(&mut world, |p| {
            p.faction = FactionKind::Raiders;
            p.position = Coord::new(4, 0);
        });

        let policy = TargetPolicy {
            radius: 40.0,
            include_non_threats: false,
        };
        assert_eq!(find_attack_target(&world, colonist, &policy), Some(near));
    }

    #[test]
    fn test_radius_scan_sorts_by_distance() {
        let mut world = test_world();
        let center = spawn_test_pawn(&mut world, |_| {});
        let b = spawn_test_pawn(&mut world, |p| p.position = Coord::new(0, 3));
        let a = spawn_test_pawn(&mut world, |p| p.position = Coord::new(1, 0));
        let _out_of_range = spawn_test_pawn(&mut world, |p| p.position = Coord::new(20, 20));

        assert_eq!(pawns_in_radius(&world, center, 5.0), vec![a, b]);
    }

    #[test]
    fn test_dozing_pawn_cannot_receive_interactions() {
        let mut world = test_world();
        let pawn = spawn_test_pawn(&mut world, |_| {});
        assert!(can_receive_interaction(&world, pawn));
        world
            .get_mut::<MentalStateSlot>(pawn)
            .unwrap()
            .try_start(MentalStateKind::Dozing, 0, Some(500));
        assert!(!can_receive_interaction(&world, pawn));
    }

    #[test]
    fn test_interval_tick_phase_differs_per_pawn() {
        let hits_a: Vec<u64> = (0..120)
            .filter(|t| is_interval_tick(*t, PawnId(1), 60))
            .collect();
        let hits_b: Vec<u64> = (0..120)
            .filter(|t| is_interval_tick(*t, PawnId(2), 60))
            .collect();
        assert_eq!(hits_a.len(), 2);
        assert_eq!(hits_b.len(), 2);
        assert_ne!(hits_a, hits_b);
    }
}
