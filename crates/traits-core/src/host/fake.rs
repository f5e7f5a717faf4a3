//! In-memory fake host for unit tests.
//!
//! Holds pawn facts in plain tables and records every mutation the rules
//! make. All randomness is scripted: push outcomes onto the queues before
//! exercising a rule, and the draws come back in order. Unscripted
//! Bernoulli trials default to false (the conservative no-op outcome) and
//! unscripted draws to their midpoint.

use std::collections::{BTreeMap, VecDeque};

use crate::components::hediff::{HediffKind, HediffSet};
use crate::components::job::Job;
use crate::components::map::Coord;
use crate::components::mental_state::{MentalStateKind, MentalStateSlot};
use crate::components::pawn::{
    FactionKind, Inventory, ItemKind, MemoryKind, PawnId, PawnKind, SkillKind, Skills, TraitKind,
    TraitSet,
};

use super::{Host, InteractionKind, TargetPolicy};

/// Pawn facts as the fake host stores them.
pub struct FakePawn {
    pub kind: PawnKind,
    pub faction: FactionKind,
    pub position: Coord,
    pub traits: TraitSet,
    pub hediffs: HediffSet,
    pub state: MentalStateSlot,
    pub core_max_health: f32,
    pub downed: bool,
    pub dead: bool,
    pub player_controlled: bool,
    pub drafted: bool,
    pub can_receive: bool,
    pub skills: Option<Skills>,
    pub inventory: Inventory,
    pub memories: Vec<MemoryKind>,
}

impl FakePawn {
    pub fn human(faction: FactionKind) -> Self {
        Self {
            kind: PawnKind::Human,
            faction,
            position: Coord::new(0, 0),
            traits: TraitSet::default(),
            hediffs: HediffSet::default(),
            state: MentalStateSlot::default(),
            core_max_health: 100.0,
            downed: false,
            dead: false,
            player_controlled: faction == FactionKind::Colony,
            drafted: false,
            can_receive: true,
            skills: Some(Skills::default()),
            inventory: Inventory::default(),
            memories: Vec::new(),
        }
    }

    pub fn animal(faction: FactionKind) -> Self {
        Self {
            kind: PawnKind::Animal,
            skills: None,
            can_receive: false,
            player_controlled: false,
            ..Self::human(faction)
        }
    }

    pub fn with_trait(mut self, kind: TraitKind) -> Self {
        self.traits.gain(kind);
        self
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Coord::new(x, y);
        self
    }
}

/// Scripted, recording implementation of [`Host`].
#[derive(Default)]
pub struct FakeHost {
    pub tick: u64,
    /// When true (the default), every fixed-cadence test fires, so rule
    /// tick methods can be driven directly.
    pub all_intervals_fire: bool,
    pawns: BTreeMap<PawnId, FakePawn>,
    pub forced_rolls: VecDeque<bool>,
    pub forced_ranges: VecDeque<u32>,
    pub forced_choices: VecDeque<usize>,
    pub started_jobs: Vec<(PawnId, Job)>,
    pub interactions: Vec<(PawnId, PawnId, InteractionKind)>,
    pub drafted: Vec<PawnId>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            all_intervals_fire: true,
            ..Self::default()
        }
    }

    pub fn add_pawn(&mut self, id: u64, pawn: FakePawn) -> PawnId {
        let id = PawnId(id);
        self.pawns.insert(id, pawn);
        id
    }

    pub fn pawn(&self, id: PawnId) -> &FakePawn {
        self.pawns.get(&id).expect("unknown fake pawn")
    }

    pub fn pawn_mut(&mut self, id: PawnId) -> &mut FakePawn {
        self.pawns.get_mut(&id).expect("unknown fake pawn")
    }

    pub fn force_roll(&mut self, outcome: bool) {
        self.forced_rolls.push_back(outcome);
    }

    pub fn force_range(&mut self, value: u32) {
        self.forced_ranges.push_back(value);
    }

    pub fn force_choice(&mut self, index: usize) {
        self.forced_choices.push_back(index);
    }
}

impl Host for FakeHost {
    fn current_tick(&self) -> u64 {
        self.tick
    }

    fn is_interval_tick(&self, pawn: PawnId, interval: u64) -> bool {
        if self.all_intervals_fire {
            return true;
        }
        (self.tick + pawn.interval_offset()) % interval == 0
    }

    fn has_trait(&self, pawn: PawnId, kind: TraitKind) -> bool {
        self.pawn(pawn).traits.has(kind)
    }

    fn is_animal(&self, pawn: PawnId) -> bool {
        self.pawn(pawn).kind.is_animal()
    }

    fn is_hostile(&self, a: PawnId, b: PawnId) -> bool {
        self.pawn(a).faction.hostile_to(self.pawn(b).faction)
    }

    fn is_player_controlled(&self, pawn: PawnId) -> bool {
        self.pawn(pawn).player_controlled
    }

    fn is_incapacitated(&self, pawn: PawnId) -> bool {
        self.pawn(pawn).downed
    }

    fn core_part_max_health(&self, pawn: PawnId) -> f32 {
        self.pawn(pawn).core_max_health
    }

    fn skill_level(&self, pawn: PawnId, skill: SkillKind) -> Option<u32> {
        self.pawn(pawn).skills.as_ref().map(|s| s.level(skill))
    }

    fn inventory_kinds(&self, pawn: PawnId) -> Vec<ItemKind> {
        self.pawn(pawn).inventory.kinds().collect()
    }

    fn severity(&self, pawn: PawnId, kind: HediffKind) -> Option<f32> {
        self.pawn(pawn).hediffs.severity(kind)
    }

    fn stage_index(&self, pawn: PawnId, kind: HediffKind) -> Option<usize> {
        self.pawn(pawn).hediffs.get(kind).map(|h| h.stage_index())
    }

    fn attach_hediff(&mut self, pawn: PawnId, kind: HediffKind, severity: f32) {
        self.pawn_mut(pawn).hediffs.attach(kind, severity);
    }

    fn set_severity(&mut self, pawn: PawnId, kind: HediffKind, severity: f32) {
        if let Some(h) = self.pawn_mut(pawn).hediffs.get_mut(kind) {
            h.set_severity(severity);
        }
    }

    fn adjust_severity(&mut self, pawn: PawnId, kind: HediffKind, delta: f32) {
        if let Some(h) = self.pawn_mut(pawn).hediffs.get_mut(kind) {
            h.adjust_severity(delta);
        }
    }

    fn remove_hediff(&mut self, pawn: PawnId, kind: HediffKind) {
        self.pawn_mut(pawn).hediffs.remove(kind);
    }

    fn current_state(&self, pawn: PawnId) -> Option<MentalStateKind> {
        self.pawn(pawn).state.current_kind()
    }

    fn try_start_state(&mut self, pawn: PawnId, kind: MentalStateKind) -> bool {
        let tick = self.tick;
        self.pawn_mut(pawn).state.try_start(kind, tick, None)
    }

    fn end_state(&mut self, pawn: PawnId, kind: MentalStateKind) {
        self.pawn_mut(pawn).state.end(kind);
    }

    fn draft(&mut self, pawn: PawnId) {
        self.pawn_mut(pawn).drafted = true;
        self.drafted.push(pawn);
    }

    fn pawns_in_radius(&self, pawn: PawnId, radius: f32) -> Vec<PawnId> {
        let center = self.pawn(pawn).position;
        let mut found: Vec<(f32, PawnId)> = self
            .pawns
            .iter()
            .filter(|(id, p)| **id != pawn && !p.dead)
            .map(|(id, p)| (center.distance_to(p.position), *id))
            .filter(|(d, _)| *d <= radius)
            .collect();
        found.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        found.into_iter().map(|(_, id)| id).collect()
    }

    fn can_receive_interaction(&self, pawn: PawnId) -> bool {
        let p = self.pawn(pawn);
        p.can_receive && !p.downed && !p.dead
    }

    fn try_interact(&mut self, actor: PawnId, recipient: PawnId, kind: InteractionKind) -> bool {
        if !self.can_receive_interaction(recipient) {
            return false;
        }
        if self.is_hostile(actor, recipient) && !kind.deliverable_to_hostile() {
            return false;
        }
        self.interactions.push((actor, recipient, kind));
        true
    }

    fn find_attack_target(&self, pawn: PawnId, policy: &TargetPolicy) -> Option<PawnId> {
        let center = self.pawn(pawn).position;
        self.pawns
            .iter()
            .filter(|(id, p)| {
                **id != pawn
                    && !p.dead
                    && self.is_hostile(pawn, **id)
                    && (policy.include_non_threats || !p.downed)
                    && center.distance_to(p.position) <= policy.radius
            })
            .min_by(|(_, a), (_, b)| {
                let da = center.distance_to(a.position);
                let db = center.distance_to(b.position);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(id, _)| *id)
    }

    fn has_melee_option(&self, pawn: PawnId, _target: PawnId) -> bool {
        let p = self.pawn(pawn);
        !p.downed && !p.dead
    }

    fn start_job(&mut self, pawn: PawnId, job: Job) {
        self.started_jobs.push((pawn, job));
    }

    fn learn_skill(&mut self, pawn: PawnId, skill: SkillKind, xp: f32) {
        if let Some(skills) = self.pawn_mut(pawn).skills.as_mut() {
            skills.learn(skill, xp);
        }
    }

    fn gain_memory(&mut self, pawn: PawnId, kind: MemoryKind) {
        self.pawn_mut(pawn).memories.push(kind);
    }

    fn chance(&mut self, _p: f32) -> bool {
        self.forced_rolls.pop_front().unwrap_or(false)
    }

    fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        self.forced_ranges
            .pop_front()
            .unwrap_or((lo + hi) / 2)
            .clamp(lo, hi)
    }

    fn choose(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.forced_choices.pop_front().unwrap_or(0).min(len - 1))
    }
}
