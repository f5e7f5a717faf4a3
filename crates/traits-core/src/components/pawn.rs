//! Pawn Components
//!
//! Identity, body, faction, skills, inventory, and mood for simulated
//! characters (humans and animals alike).

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use super::map::Coord;

/// Marker component identifying an entity as a pawn.
#[derive(Component, Debug, Clone, Default)]
pub struct Pawn;

/// Stable numeric identifier for a pawn.
#[derive(
    Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PawnId(pub u64);

impl PawnId {
    /// Per-pawn offset used to spread fixed-interval ticks across pawns,
    /// so every pawn does not run its cadenced work on the same frame.
    pub fn interval_offset(&self) -> u64 {
        self.0.wrapping_mul(0x9E37_79B9)
    }
}

/// Human-readable name.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct PawnName(pub String);

/// Whether the pawn is a human or an animal.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PawnKind {
    #[default]
    Human,
    Animal,
}

impl PawnKind {
    pub fn is_animal(self) -> bool {
        matches!(self, PawnKind::Animal)
    }

    pub fn label(self) -> &'static str {
        match self {
            PawnKind::Human => "human",
            PawnKind::Animal => "animal",
        }
    }
}

/// The nine grantable character traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    AnimalFriend,
    Berserker,
    Boring,
    Caravaneer,
    DrunkenMaster,
    Juggernaut,
    SatanSpawn,
    Teacher,
    Slob,
}

impl TraitKind {
    pub fn label(self) -> &'static str {
        match self {
            TraitKind::AnimalFriend => "animal_friend",
            TraitKind::Berserker => "berserker",
            TraitKind::Boring => "boring",
            TraitKind::Caravaneer => "caravaneer",
            TraitKind::DrunkenMaster => "drunken_master",
            TraitKind::Juggernaut => "juggernaut",
            TraitKind::SatanSpawn => "satan_spawn",
            TraitKind::Teacher => "teacher",
            TraitKind::Slob => "slob",
        }
    }
}

/// The set of traits a pawn carries. Traits can be granted or stripped at
/// runtime (scenario effects do both).
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraitSet {
    traits: Vec<TraitKind>,
}

impl TraitSet {
    pub fn new(traits: impl IntoIterator<Item = TraitKind>) -> Self {
        let mut set = Self::default();
        for t in traits {
            set.gain(t);
        }
        set
    }

    pub fn has(&self, kind: TraitKind) -> bool {
        self.traits.contains(&kind)
    }

    pub fn gain(&mut self, kind: TraitKind) {
        if !self.has(kind) {
            self.traits.push(kind);
        }
    }

    pub fn remove(&mut self, kind: TraitKind) {
        self.traits.retain(|t| *t != kind);
    }

    pub fn iter(&self) -> impl Iterator<Item = TraitKind> + '_ {
        self.traits.iter().copied()
    }
}

/// Which side a pawn belongs to. Hostility is derived from the pair of
/// faction kinds; trait rules may override the result.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactionKind {
    Colony,
    Raiders,
    Wildlife,
}

impl FactionKind {
    /// Raw faction-level hostility, before trait overrides.
    pub fn hostile_to(self, other: FactionKind) -> bool {
        matches!(
            (self, other),
            (FactionKind::Colony, FactionKind::Raiders)
                | (FactionKind::Raiders, FactionKind::Colony)
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            FactionKind::Colony => "colony",
            FactionKind::Raiders => "raiders",
            FactionKind::Wildlife => "wildlife",
        }
    }
}

/// Body state. The core part's max health is the scaling base for the
/// berserker ire formula; health below the downed fraction incapacitates.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub core_max: f32,
    pub current: f32,
    pub downed: bool,
    pub dead: bool,
}

impl Health {
    pub fn new(core_max: f32) -> Self {
        Self {
            core_max,
            current: core_max,
            downed: false,
            dead: false,
        }
    }

    /// Applies damage and updates downed/dead flags. Returns `(downed,
    /// died)` transitions that happened on this hit.
    pub fn apply_damage(&mut self, amount: f32, downed_fraction: f32) -> (bool, bool) {
        if self.dead {
            return (false, false);
        }
        self.current = (self.current - amount).max(0.0);
        let mut newly_downed = false;
        let mut died = false;
        if self.current <= 0.0 {
            self.dead = true;
            self.downed = false;
            died = true;
        } else if !self.downed && self.current <= self.core_max * downed_fraction {
            self.downed = true;
            newly_downed = true;
        }
        (newly_downed, died)
    }

    pub fn is_standing(&self) -> bool {
        !self.dead && !self.downed
    }
}

/// Grid position.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position(pub Coord);

/// Drafted pawns hold position and fight; undrafted pawns follow their own
/// routines.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Drafted(pub bool);

/// Prisoners don't contribute caravan bonuses and never get drafted.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Prisoner(pub bool);

/// Body size factor; scales starting-inventory amounts.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BodySize(pub f32);

impl Default for BodySize {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Movement pacing plus stagger from recent hits.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Mobility {
    /// Ticks a pawn needs per cell moved.
    pub ticks_per_cell: u64,
    /// Next tick the pawn may move on.
    pub next_move_tick: u64,
    /// Staggered pawns don't move until this tick.
    pub staggered_until: u64,
}

impl Mobility {
    pub fn new(ticks_per_cell: u64) -> Self {
        Self {
            ticks_per_cell,
            next_move_tick: 0,
            staggered_until: 0,
        }
    }

    pub fn can_move(&self, tick: u64) -> bool {
        tick >= self.next_move_tick && tick >= self.staggered_until
    }
}

/// A trainable skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Melee,
    Shooting,
    Construction,
    Cooking,
    Medicine,
    Social,
    Crafting,
}

impl SkillKind {
    pub const ALL: [SkillKind; 7] = [
        SkillKind::Melee,
        SkillKind::Shooting,
        SkillKind::Construction,
        SkillKind::Cooking,
        SkillKind::Medicine,
        SkillKind::Social,
        SkillKind::Crafting,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SkillKind::Melee => "melee",
            SkillKind::Shooting => "shooting",
            SkillKind::Construction => "construction",
            SkillKind::Cooking => "cooking",
            SkillKind::Medicine => "medicine",
            SkillKind::Social => "social",
            SkillKind::Crafting => "crafting",
        }
    }
}

/// XP required to advance one level.
pub const XP_PER_LEVEL: f32 = 1_000.0;

/// Highest reachable skill level.
pub const MAX_SKILL_LEVEL: u32 = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub kind: SkillKind,
    pub level: u32,
    pub xp: f32,
}

/// Skill tracker. Animals don't carry one.
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Skills {
    skills: Vec<Skill>,
}

impl Skills {
    pub fn new(levels: impl IntoIterator<Item = (SkillKind, u32)>) -> Self {
        Self {
            skills: levels
                .into_iter()
                .map(|(kind, level)| Skill {
                    kind,
                    level,
                    xp: 0.0,
                })
                .collect(),
        }
    }

    pub fn level(&self, kind: SkillKind) -> u32 {
        self.skills
            .iter()
            .find(|s| s.kind == kind)
            .map_or(0, |s| s.level)
    }

    /// Grants XP, advancing levels at each threshold.
    pub fn learn(&mut self, kind: SkillKind, xp: f32) {
        let skill = match self.skills.iter_mut().find(|s| s.kind == kind) {
            Some(s) => s,
            None => {
                self.skills.push(Skill {
                    kind,
                    level: 0,
                    xp: 0.0,
                });
                self.skills.last_mut().expect("just pushed")
            }
        };
        skill.xp += xp;
        while skill.xp >= XP_PER_LEVEL && skill.level < MAX_SKILL_LEVEL {
            skill.xp -= XP_PER_LEVEL;
            skill.level += 1;
        }
    }
}

/// Carryable item kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Beer,
    Mead,
    Pemmican,
}

impl ItemKind {
    pub fn is_alcohol(self) -> bool {
        matches!(self, ItemKind::Beer | ItemKind::Mead)
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Beer => "beer",
            ItemKind::Mead => "mead",
            ItemKind::Pemmican => "pemmican",
        }
    }
}

/// Pawn inventory as item counts.
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<(ItemKind, u32)>,
}

impl Inventory {
    pub fn add(&mut self, kind: ItemKind, count: u32) {
        if count == 0 {
            return;
        }
        match self.items.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, c)) => *c += count,
            None => self.items.push((kind, count)),
        }
    }

    pub fn count(&self, kind: ItemKind) -> u32 {
        self.items
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, c)| *c)
    }

    /// Removes one item of the given kind; true if one was present.
    pub fn take_one(&mut self, kind: ItemKind) -> bool {
        if let Some((_, c)) = self.items.iter_mut().find(|(k, _)| *k == kind) {
            if *c > 0 {
                *c -= 1;
                self.items.retain(|(_, c)| *c > 0);
                return true;
            }
        }
        false
    }

    pub fn kinds(&self) -> impl Iterator<Item = ItemKind> + '_ {
        self.items.iter().map(|(k, _)| *k)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Dirt picked up outdoors and tracked inside as filth. Doormats wipe it,
/// unless the pawn can't be bothered.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TrackedDirt(pub f32);

/// Kinds of mood memories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    HurtAnimal,
}

impl MemoryKind {
    pub fn mood_offset(self) -> f32 {
        match self {
            MemoryKind::HurtAnimal => -6.0,
        }
    }

    pub fn duration_ticks(self) -> u64 {
        match self {
            MemoryKind::HurtAnimal => 45_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub kind: MemoryKind,
    pub expires_at: u64,
}

/// Mood memories with expiry; the summed offset shows up in snapshots.
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mood {
    pub memories: Vec<Memory>,
    /// Alcohol addiction flag; addicted pawns don't get courage beers at
    /// generation.
    pub alcohol_addict: bool,
}

impl Mood {
    pub fn gain_memory(&mut self, kind: MemoryKind, tick: u64) {
        self.memories.push(Memory {
            kind,
            expires_at: tick + kind.duration_ticks(),
        });
    }

    pub fn expire(&mut self, tick: u64) {
        self.memories.retain(|m| m.expires_at > tick);
    }

    pub fn offset(&self) -> f32 {
        self.memories.iter().map(|m| m.kind.mood_offset()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_set_gain_and_remove() {
        let mut set = TraitSet::default();
        set.gain(TraitKind::Berserker);
        set.gain(TraitKind::Berserker);
        assert!(set.has(TraitKind::Berserker));
        assert_eq!(set.iter().count(), 1);
        set.remove(TraitKind::Berserker);
        assert!(!set.has(TraitKind::Berserker));
    }

    #[test]
    fn test_faction_hostility() {
        assert!(FactionKind::Colony.hostile_to(FactionKind::Raiders));
        assert!(FactionKind::Raiders.hostile_to(FactionKind::Colony));
        assert!(!FactionKind::Colony.hostile_to(FactionKind::Wildlife));
        assert!(!FactionKind::Wildlife.hostile_to(FactionKind::Raiders));
    }

    #[test]
    fn test_health_downed_then_dead() {
        let mut health = Health::new(100.0);
        let (downed, died) = health.apply_damage(85.0, 0.2);
        assert!(downed && !died);
        assert!(health.downed);
        let (downed, died) = health.apply_damage(20.0, 0.2);
        assert!(!downed && died);
        assert!(health.dead);
        // Damage to the dead is a no-op.
        assert_eq!(health.apply_damage(5.0, 0.2), (false, false));
    }

    #[test]
    fn test_skill_level_up() {
        let mut skills = Skills::new([(SkillKind::Melee, 4)]);
        skills.learn(SkillKind::Melee, 2_400.0);
        assert_eq!(skills.level(SkillKind::Melee), 6);
        // Untracked skills start from level 0.
        skills.learn(SkillKind::Cooking, 1_000.0);
        assert_eq!(skills.level(SkillKind::Cooking), 1);
    }

    #[test]
    fn test_inventory_take() {
        let mut inv = Inventory::default();
        inv.add(ItemKind::Beer, 2);
        assert!(inv.take_one(ItemKind::Beer));
        assert!(inv.take_one(ItemKind::Beer));
        assert!(!inv.take_one(ItemKind::Beer));
        assert!(inv.is_empty());
    }

    #[test]
    fn test_mood_memory_expiry() {
        let mut mood = Mood::default();
        mood.gain_memory(MemoryKind::HurtAnimal, 100);
        assert!(mood.offset() < 0.0);
        mood.expire(100 + MemoryKind::HurtAnimal.duration_ticks() + 1);
        assert_eq!(mood.offset(), 0.0);
    }

    #[test]
    fn test_interval_offsets_differ() {
        assert_ne!(
            PawnId(1).interval_offset() % 60,
            PawnId(2).interval_offset() % 60
        );
    }
}
