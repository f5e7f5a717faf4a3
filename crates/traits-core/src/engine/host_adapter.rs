//! Host Adapter
//!
//! [`EcsHost`] implements the [`Host`] seam over `&mut World`. Exclusive
//! systems wrap the world in an adapter, hand it to a behavior rule, and
//! the rule's reads and writes land on the entity storage and the shared
//! `SimRng`.

use bevy_ecs::prelude::*;
use rand::Rng;

use crate::components::hediff::{HediffKind, HediffSet};
use crate::components::job::{CurrentJob, Job};
use crate::components::mental_state::{MentalStateKind, MentalStateSlot};
use crate::components::pawn::{
    Drafted, FactionKind, Health, Inventory, ItemKind, MemoryKind, Mood, PawnId, PawnKind,
    SkillKind, Skills, TraitKind, TraitSet,
};
use crate::config::Config;
use crate::engine::{queries, PawnIndex};
use crate::host::{Host, InteractionKind, TargetPolicy};
use crate::{SimRng, SimulationState};

/// The engine-side [`Host`] implementation.
pub struct EcsHost<'w> {
    pub world: &'w mut World,
}

impl<'w> EcsHost<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }

    fn entity(&self, pawn: PawnId) -> Option<Entity> {
        self.world.resource::<PawnIndex>().entity(pawn)
    }

    fn pawn_id_of(&self, entity: Entity) -> Option<PawnId> {
        self.world.get::<PawnId>(entity).copied()
    }
}

impl Host for EcsHost<'_> {
    fn current_tick(&self) -> u64 {
        self.world.resource::<SimulationState>().current_tick
    }

    fn is_interval_tick(&self, pawn: PawnId, interval: u64) -> bool {
        queries::is_interval_tick(self.current_tick(), pawn, interval)
    }

    fn has_trait(&self, pawn: PawnId, kind: TraitKind) -> bool {
        self.entity(pawn)
            .and_then(|e| self.world.get::<TraitSet>(e))
            .is_some_and(|t| t.has(kind))
    }

    fn is_animal(&self, pawn: PawnId) -> bool {
        self.entity(pawn)
            .and_then(|e| self.world.get::<PawnKind>(e))
            .is_some_and(|k| k.is_animal())
    }

    fn is_hostile(&self, a: PawnId, b: PawnId) -> bool {
        match (self.entity(a), self.entity(b)) {
            (Some(ea), Some(eb)) => queries::hostile(self.world, ea, eb),
            _ => false,
        }
    }

    fn is_player_controlled(&self, pawn: PawnId) -> bool {
        self.entity(pawn).is_some_and(|e| {
            let colony = self.world.get::<FactionKind>(e) == Some(&FactionKind::Colony);
            let human = !queries::is_animal(self.world, e);
            colony && human
        })
    }

    fn is_incapacitated(&self, pawn: PawnId) -> bool {
        self.entity(pawn)
            .and_then(|e| self.world.get::<Health>(e))
            .is_some_and(|h| h.downed || h.dead)
    }

    fn core_part_max_health(&self, pawn: PawnId) -> f32 {
        self.entity(pawn)
            .and_then(|e| self.world.get::<Health>(e))
            .map_or(1.0, |h| h.core_max)
    }

    fn skill_level(&self, pawn: PawnId, skill: SkillKind) -> Option<u32> {
        let entity = self.entity(pawn)?;
        self.world.get::<Skills>(entity).map(|s| s.level(skill))
    }

    fn inventory_kinds(&self, pawn: PawnId) -> Vec<ItemKind> {
        self.entity(pawn)
            .and_then(|e| self.world.get::<Inventory>(e))
            .map(|inv| inv.kinds().collect())
            .unwrap_or_default()
    }

    fn severity(&self, pawn: PawnId, kind: HediffKind) -> Option<f32> {
        let entity = self.entity(pawn)?;
        self.world.get::<HediffSet>(entity)?.severity(kind)
    }

    fn stage_index(&self, pawn: PawnId, kind: HediffKind) -> Option<usize> {
        let entity = self.entity(pawn)?;
        queries::stage_index(self.world, entity, kind)
    }

    fn attach_hediff(&mut self, pawn: PawnId, kind: HediffKind, severity: f32) {
        if let Some(mut set) = self
            .entity(pawn)
            .and_then(|e| self.world.get_mut::<HediffSet>(e))
        {
            set.attach(kind, severity);
        }
    }

    fn set_severity(&mut self, pawn: PawnId, kind: HediffKind, severity: f32) {
        if let Some(mut set) = self
            .entity(pawn)
            .and_then(|e| self.world.get_mut::<HediffSet>(e))
        {
            if let Some(h) = set.get_mut(kind) {
                h.set_severity(severity);
            }
        }
    }

    fn adjust_severity(&mut self, pawn: PawnId, kind: HediffKind, delta: f32) {
        if let Some(mut set) = self
            .entity(pawn)
            .and_then(|e| self.world.get_mut::<HediffSet>(e))
        {
            if let Some(h) = set.get_mut(kind) {
                h.adjust_severity(delta);
            }
        }
    }

    fn remove_hediff(&mut self, pawn: PawnId, kind: HediffKind) {
        if let Some(mut set) = self
            .entity(pawn)
            .and_then(|e| self.world.get_mut::<HediffSet>(e))
        {
            set.remove(kind);
        }
    }

    fn current_state(&self, pawn: PawnId) -> Option<MentalStateKind> {
        self.entity(pawn)
            .and_then(|e| self.world.get::<MentalStateSlot>(e))
            .and_then(|s| s.current_kind())
    }

    fn try_start_state(&mut self, pawn: PawnId, kind: MentalStateKind) -> bool {
        let tick = self.current_tick();
        let expires_at = match kind {
            // Dozes wear off on their own after a bounded random while.
            MentalStateKind::Dozing => {
                let cfg = self.world.resource::<Config>().boring.clone();
                let ticks = self
                    .world
                    .resource_mut::<SimRng>()
                    .0
                    .gen_range(cfg.doze_min_ticks..=cfg.doze_max_ticks);
                Some(tick + u64::from(ticks))
            }
            MentalStateKind::Berserking | MentalStateKind::Panic => None,
        };
        self.entity(pawn)
            .and_then(|e| self.world.get_mut::<MentalStateSlot>(e))
            .is_some_and(|mut slot| slot.try_start(kind, tick, expires_at))
    }

    fn end_state(&mut self, pawn: PawnId, kind: MentalStateKind) {
        if let Some(mut slot) = self
            .entity(pawn)
            .and_then(|e| self.world.get_mut::<MentalStateSlot>(e))
        {
            slot.end(kind);
        }
    }

    fn draft(&mut self, pawn: PawnId) {
        if let Some(mut drafted) = self
            .entity(pawn)
            .and_then(|e| self.world.get_mut::<Drafted>(e))
        {
            drafted.0 = true;
        }
    }

    fn pawns_in_radius(&self, pawn: PawnId, radius: f32) -> Vec<PawnId> {
        let Some(entity) = self.entity(pawn) else {
            return Vec::new();
        };
        queries::pawns_in_radius(self.world, entity, radius)
            .into_iter()
            .filter_map(|e| self.pawn_id_of(e))
            .collect()
    }

    fn can_receive_interaction(&self, pawn: PawnId) -> bool {
        self.entity(pawn)
            .is_some_and(|e| queries::can_receive_interaction(self.world, e))
    }

    fn try_interact(&mut self, actor: PawnId, recipient: PawnId, kind: InteractionKind) -> bool {
        let (Some(actor_e), Some(recipient_e)) = (self.entity(actor), self.entity(recipient))
        else {
            return false;
        };
        crate::systems::interactions::deliver(self.world, actor_e, recipient_e, kind)
    }

    fn find_attack_target(&self, pawn: PawnId, policy: &TargetPolicy) -> Option<PawnId> {
        let entity = self.entity(pawn)?;
        queries::find_attack_target(self.world, entity, policy)
            .and_then(|e| self.pawn_id_of(e))
    }

    fn has_melee_option(&self, pawn: PawnId, _target: PawnId) -> bool {
        self.entity(pawn)
            .is_some_and(|e| queries::has_melee_option(self.world, e))
    }

    fn start_job(&mut self, pawn: PawnId, job: Job) {
        let tick = self.current_tick();
        if let Some(mut current) = self
            .entity(pawn)
            .and_then(|e| self.world.get_mut::<CurrentJob>(e))
        {
            current.start(job, tick);
        }
    }

    fn learn_skill(&mut self, pawn: PawnId, skill: SkillKind, xp: f32) {
        if let Some(mut skills) = self
            .entity(pawn)
            .and_then(|e| self.world.get_mut::<Skills>(e))
        {
            skills.learn(skill, xp);
        }
    }

    fn gain_memory(&mut self, pawn: PawnId, kind: MemoryKind) {
        let tick = self.current_tick();
        if let Some(mut mood) = self
            .entity(pawn)
            .and_then(|e| self.world.get_mut::<Mood>(e))
        {
            mood.gain_memory(kind, tick);
        }
    }

    fn chance(&mut self, p: f32) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.world
            .resource_mut::<SimRng>()
            .0
            .gen_bool(f64::from(p))
    }

    fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if lo >= hi {
            return lo;
        }
        self.world.resource_mut::<SimRng>().0.gen_range(lo..=hi)
    }

    fn choose(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.world.resource_mut::<SimRng>().0.gen_range(0..len))
    }
}
