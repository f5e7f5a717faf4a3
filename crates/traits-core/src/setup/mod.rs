//! Scenario Setup
//!
//! Spawning: the demo colony (one pawn per trait plus pets and wildlife)
//! and the raid that kicks the scenario off.

use bevy_ecs::prelude::*;
use rand::Rng;

use crate::components::hediff::HediffSet;
use crate::components::job::CurrentJob;
use crate::components::map::{Coord, Door, Doormat, Map};
use crate::components::mental_state::MentalStateSlot;
use crate::components::pawn::{
    BodySize, Drafted, FactionKind, Health, Inventory, ItemKind, Mobility, Mood, Pawn, PawnKind,
    PawnName, Position, Prisoner, SkillKind, Skills, TrackedDirt, TraitKind,
};
use crate::engine::PawnIndex;
use crate::SimRng;

/// Everything needed to spawn one pawn.
#[derive(Debug, Clone)]
pub struct PawnSpec {
    pub name: String,
    pub kind: PawnKind,
    pub faction: FactionKind,
    pub position: Coord,
    pub traits: Vec<TraitKind>,
    pub core_health: f32,
    pub body_size: f32,
    pub ticks_per_cell: u64,
    /// Explicit skill levels; humans without any get random ones.
    pub skills: Vec<(SkillKind, u32)>,
    pub prisoner: bool,
    pub drafted: bool,
    pub downed: bool,
    pub alcohol_addict: bool,
}

impl PawnSpec {
    pub fn human(name: impl Into<String>, faction: FactionKind) -> Self {
        Self {
            name: name.into(),
            kind: PawnKind::Human,
            faction,
            position: Coord::new(0, 0),
            traits: Vec::new(),
            core_health: 100.0,
            body_size: 1.0,
            ticks_per_cell: 3,
            skills: Vec::new(),
            prisoner: false,
            drafted: false,
            downed: false,
            alcohol_addict: false,
        }
    }

    pub fn animal(name: impl Into<String>, faction: FactionKind, body_size: f32) -> Self {
        Self {
            kind: PawnKind::Animal,
            body_size,
            core_health: 60.0 * body_size,
            ticks_per_cell: 2,
            ..Self::human(name, faction)
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Coord::new(x, y);
        self
    }

    pub fn with_trait(mut self, kind: TraitKind) -> Self {
        self.traits.push(kind);
        self
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = (SkillKind, u32)>) -> Self {
        self.skills = skills.into_iter().collect();
        self
    }
}

/// Spawns a pawn from its spec and registers it in the index.
pub fn spawn_pawn(world: &mut World, spec: PawnSpec) -> Entity {
    let id = world.resource_mut::<PawnIndex>().allocate();
    let mut health = Health::new(spec.core_health);
    if spec.downed {
        health.downed = true;
        health.current = spec.core_health * 0.15;
    }
    let mut mood = Mood::default();
    mood.alcohol_addict = spec.alcohol_addict;

    let entity = world
        .spawn((
            Pawn,
            id,
            PawnName(spec.name),
            spec.kind,
            spec.faction,
            Position(spec.position),
            health,
            crate::TraitSet::new(spec.traits.iter().copied()),
            HediffSet::default(),
        ))
        .insert((
            MentalStateSlot::default(),
            CurrentJob::default(),
            Drafted(spec.drafted),
            Prisoner(spec.prisoner),
            BodySize(spec.body_size),
            Mobility::new(spec.ticks_per_cell),
            Inventory::default(),
            mood,
            TrackedDirt::default(),
        ))
        .id();

    if spec.kind == PawnKind::Human {
        let skills = if spec.skills.is_empty() {
            random_skills(world)
        } else {
            Skills::new(spec.skills.clone())
        };
        world.entity_mut(entity).insert(skills);
    }

    // A Drunken Master generates with a little alcohol on hand.
    if spec.traits.contains(&TraitKind::DrunkenMaster) {
        let rules = world.resource::<crate::Behaviors>().clone();
        let count = world.resource_scope(|_, mut rng: Mut<SimRng>| {
            rules
                .drunken_master
                .starting_alcohol(&mut rng.0, spec.body_size, spec.alcohol_addict)
        });
        if count > 0 {
            if let Some(mut inv) = world.get_mut::<Inventory>(entity) {
                inv.add(ItemKind::Beer, count);
            }
        }
    }

    world.resource_mut::<PawnIndex>().register(id, entity);
    entity
}

fn random_skills(world: &mut World) -> Skills {
    world.resource_scope(|_, mut rng: Mut<SimRng>| {
        Skills::new(
            SkillKind::ALL
                .iter()
                .map(|kind| (*kind, rng.0.gen_range(0..=9))),
        )
    })
}

/// The demo map: a walled-in home area with a door to the outside and a
/// doormat just inside it.
pub fn demo_map(doormats_enabled: bool) -> Map {
    let mut map = Map::new(40, 40, Coord::new(2, 2), Coord::new(12, 12));
    map.doors.push(Door::new(Coord::new(13, 7)));
    if doormats_enabled {
        map.doormats.push(Doormat {
            position: Coord::new(12, 7),
        });
    }
    map
}

/// The demo colony: one colonist per trait, plus pets and wildlife.
pub fn spawn_colony(world: &mut World) -> Vec<Entity> {
    let colonists = vec![
        PawnSpec::human("Brakka", FactionKind::Colony)
            .with_trait(TraitKind::Berserker)
            .with_skills([(SkillKind::Melee, 9), (SkillKind::Construction, 5)])
            .at(6, 6),
        PawnSpec::human("Odette", FactionKind::Colony)
            .with_trait(TraitKind::Teacher)
            .with_skills([
                (SkillKind::Melee, 6),
                (SkillKind::Cooking, 14),
                (SkillKind::Medicine, 12),
                (SkillKind::Social, 11),
            ])
            .at(5, 7),
        PawnSpec::human("Mumford", FactionKind::Colony)
            .with_trait(TraitKind::Boring)
            .at(7, 5),
        PawnSpec::human("Anselm", FactionKind::Colony)
            .with_trait(TraitKind::DrunkenMaster)
            .with_skills([(SkillKind::Melee, 7)])
            .at(4, 4),
        PawnSpec::human("Petra", FactionKind::Colony)
            .with_trait(TraitKind::AnimalFriend)
            .at(8, 8),
        PawnSpec::human("Ivo", FactionKind::Colony)
            .with_trait(TraitKind::Caravaneer)
            .at(3, 9),
        PawnSpec::human("Lazlo", FactionKind::Colony)
            .with_trait(TraitKind::SatanSpawn)
            .at(11, 7),
        PawnSpec::human("Grubb", FactionKind::Colony)
            .with_trait(TraitKind::Slob)
            .at(10, 6),
        PawnSpec::human("Hodd", FactionKind::Colony)
            .with_trait(TraitKind::Juggernaut)
            .with_skills([(SkillKind::Melee, 8)])
            .at(9, 4),
    ];
    let mut spawned: Vec<Entity> = colonists
        .into_iter()
        .map(|spec| spawn_pawn(world, spec))
        .collect();

    // Pets inside the walls, wildlife out in the brush.
    spawned.push(spawn_pawn(
        world,
        PawnSpec::animal("Biscuit", FactionKind::Colony, 0.6).at(6, 9),
    ));
    spawned.push(spawn_pawn(
        world,
        PawnSpec::animal("Old Grey", FactionKind::Wildlife, 1.2).at(30, 8),
    ));
    spawned.push(spawn_pawn(
        world,
        PawnSpec::animal("Hen", FactionKind::Wildlife, 0.3).at(26, 10),
    ));
    spawned
}

/// The raid: three raiders and a war hound, entering from the far corner.
pub fn spawn_raid(world: &mut World) -> Vec<Entity> {
    let specs = vec![
        PawnSpec::human("Grix", FactionKind::Raiders)
            .with_skills([(SkillKind::Melee, 8)])
            .at(36, 36),
        PawnSpec::human("Sena", FactionKind::Raiders)
            .with_skills([(SkillKind::Melee, 6)])
            .at(37, 35),
        PawnSpec::human("Vole", FactionKind::Raiders)
            .with_skills([(SkillKind::Melee, 4)])
            .at(35, 37),
        PawnSpec::animal("Fang", FactionKind::Raiders, 0.9).at(36, 34),
    ];
    specs
        .into_iter()
        .map(|spec| spawn_pawn(world, spec))
        .collect()
}

/// Drafts every standing colony human.
pub fn draft_colony(world: &mut World) {
    let entities: Vec<Entity> = world
        .iter_entities()
        .filter(|e| {
            e.get::<FactionKind>() == Some(&FactionKind::Colony)
                && e.get::<PawnKind>().is_some_and(|k| !k.is_animal())
                && e.get::<Health>().is_some_and(|h| h.is_standing())
                && !e.get::<Prisoner>().is_some_and(|p| p.0)
        })
        .map(|e| e.id())
        .collect();
    for entity in entities {
        if let Some(mut drafted) = world.get_mut::<Drafted>(entity) {
            drafted.0 = true;
        }
    }
}

/// A bare world with every resource the systems expect, for tests.
#[cfg(test)]
pub fn test_world() -> World {
    use rand::SeedableRng;

    let config = crate::Config::default();
    let mut world = World::new();
    world.insert_resource(crate::Behaviors::from_config(&config));
    world.insert_resource(config);
    world.insert_resource(PawnIndex::new());
    world.insert_resource(SimRng(rand::rngs::SmallRng::seed_from_u64(42)));
    world.insert_resource(crate::SimulationState::default());
    world.insert_resource(crate::events::TickEvents::new());
    world.insert_resource(crate::events::EventLog::null());
    world.insert_resource(crate::systems::DamageQueue::new());
    world.insert_resource(demo_map(true));
    world
}

/// Test fixture spec with direct field access.
#[cfg(test)]
pub struct TestPawn {
    pub kind: PawnKind,
    pub faction: FactionKind,
    pub position: Coord,
    pub traits: Vec<TraitKind>,
    pub skills: Vec<(SkillKind, u32)>,
    pub downed: bool,
    pub drafted: bool,
}

/// Spawns a pawn for tests, customized through a closure.
#[cfg(test)]
pub fn spawn_test_pawn(world: &mut World, customize: impl FnOnce(&mut TestPawn)) -> Entity {
    let mut spec = TestPawn {
        kind: PawnKind::Human,
        faction: FactionKind::Colony,
        position: Coord::new(0, 0),
        traits: Vec::new(),
        skills: Vec::new(),
        downed: false,
        drafted: false,
    };
    customize(&mut spec);

    let mut pawn_spec = match spec.kind {
        PawnKind::Human => PawnSpec::human("Testy", spec.faction),
        PawnKind::Animal => PawnSpec::animal("Testy", spec.faction, 0.8),
    };
    pawn_spec.position = spec.position;
    pawn_spec.traits = spec.traits;
    pawn_spec.downed = spec.downed;
    pawn_spec.drafted = spec.drafted;
    if !spec.skills.is_empty() {
        pawn_spec.skills = spec.skills;
    } else if spec.kind == PawnKind::Human {
        // Deterministic flat skills keep test RNG draws predictable.
        pawn_spec.skills = SkillKind::ALL.iter().map(|k| (*k, 0)).collect();
    }
    spawn_pawn(world, pawn_spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colony_has_one_pawn_per_trait() {
        let mut world = test_world();
        let spawned = spawn_colony(&mut world);
        assert_eq!(spawned.len(), 12);

        for kind in [
            TraitKind::AnimalFriend,
            TraitKind::Berserker,
            TraitKind::Boring,
            TraitKind::Caravaneer,
            TraitKind::DrunkenMaster,
            TraitKind::Juggernaut,
            TraitKind::SatanSpawn,
            TraitKind::Teacher,
            TraitKind::Slob,
        ] {
            let carriers = spawned
                .iter()
                .filter(|e| world.get::<crate::TraitSet>(**e).is_some_and(|t| t.has(kind)))
                .count();
            assert_eq!(carriers, 1, "exactly one colonist should carry {:?}", kind);
        }
    }

    #[test]
    fn test_pawn_ids_are_sequential_and_indexed() {
        let mut world = test_world();
        let a = spawn_pawn(&mut world, PawnSpec::human("A", FactionKind::Colony));
        let b = spawn_pawn(&mut world, PawnSpec::human("B", FactionKind::Colony));
        let id_a = *world.get::<crate::PawnId>(a).unwrap();
        let id_b = *world.get::<crate::PawnId>(b).unwrap();
        assert_eq!(id_b.0, id_a.0 + 1);
        assert_eq!(world.resource::<PawnIndex>().entity(id_a), Some(a));
    }

    #[test]
    fn test_draft_colony_skips_animals_and_raiders() {
        let mut world = test_world();
        spawn_colony(&mut world);
        let raiders = spawn_raid(&mut world);
        draft_colony(&mut world);

        let drafted: Vec<bool> = world
            .iter_entities()
            .filter(|e| e.contains::<Pawn>())
            .filter(|e| e.get::<Drafted>().is_some_and(|d| d.0))
            .map(|e| {
                e.get::<FactionKind>() == Some(&FactionKind::Colony)
                    && e.get::<PawnKind>().is_some_and(|k| !k.is_animal())
            })
            .collect();
        assert_eq!(drafted.len(), 9);
        assert!(drafted.into_iter().all(|ok| ok));
        let _ = raiders;
    }
}
