//! Host Interface
//!
//! The seam between the trait behavior rules and the engine. Every rule
//! reads and mutates the world exclusively through this trait, so unit
//! tests can substitute [`fake::FakeHost`] with scripted probability rolls
//! and the engine adapter stays the only code touching entity storage.
//!
//! Randomness is routed through the host on purpose: every Bernoulli trial
//! and bounded draw a rule makes can be forced from a test.

use crate::components::hediff::HediffKind;
use crate::components::job::Job;
use crate::components::mental_state::MentalStateKind;
use crate::components::pawn::{ItemKind, MemoryKind, PawnId, SkillKind, TraitKind};

use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fake;

/// Damage categories. Execution-style cuts are exempt from the
/// hurt-animal remorse rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    Blunt,
    Cut,
    Stab,
    Gunshot,
    Bite,
    /// Non-wounding shock; stuns instead of staggering.
    Stun,
    ExecutionCut,
}

impl DamageKind {
    pub fn is_execution(self) -> bool {
        matches!(self, DamageKind::ExecutionCut)
    }

    pub fn label(self) -> &'static str {
        match self {
            DamageKind::Blunt => "blunt",
            DamageKind::Cut => "cut",
            DamageKind::Stab => "stab",
            DamageKind::Gunshot => "gunshot",
            DamageKind::Bite => "bite",
            DamageKind::Stun => "stun",
            DamageKind::ExecutionCut => "execution_cut",
        }
    }
}

/// A damage event as delivered to the behavior hooks.
#[derive(Debug, Clone, Copy)]
pub struct DamageInfo {
    /// Damage actually dealt.
    pub amount: f32,
    pub kind: DamageKind,
    /// The pawn that caused the damage, when one did.
    pub instigator: Option<PawnId>,
}

/// Social interaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Chitchat,
    DeepTalk,
    Insult,
    /// Insult variant that never escalates and is the only interaction
    /// deliverable to hostile recipients.
    InsultEnemy,
    BuildRapport,
    AnimalChat,
}

impl InteractionKind {
    /// Whether the interaction may be delivered to a hostile recipient.
    pub fn deliverable_to_hostile(self) -> bool {
        matches!(self, InteractionKind::InsultEnemy)
    }

    pub fn label(self) -> &'static str {
        match self {
            InteractionKind::Chitchat => "chitchat",
            InteractionKind::DeepTalk => "deep_talk",
            InteractionKind::Insult => "insult",
            InteractionKind::InsultEnemy => "insult_enemy",
            InteractionKind::BuildRapport => "build_rapport",
            InteractionKind::AnimalChat => "animal_chat",
        }
    }
}

/// Parameters for an attack-target scan.
#[derive(Debug, Clone, Copy)]
pub struct TargetPolicy {
    /// Maximum acquire distance.
    pub radius: f32,
    /// Keep incapacitated and otherwise non-threatening targets in the
    /// candidate set. Normal combat AI drops them.
    pub include_non_threats: bool,
}

/// Combat stats the trait rules can offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    MeleeHitChance,
    MeleeDodgeChance,
}

/// Engine surface consumed by the behavior rules.
///
/// Grouped the way the behaviors use it: tick cadence, pawn facts, status
/// values, the exclusive mental-state slot, social interaction, targeting
/// and jobs, and host-routed randomness.
pub trait Host {
    // --- tick cadence ---

    fn current_tick(&self) -> u64;

    /// Pawn-offset fixed-cadence test: true once every `interval` ticks,
    /// with the phase spread per pawn so cadenced work doesn't bunch up.
    fn is_interval_tick(&self, pawn: PawnId, interval: u64) -> bool;

    // --- pawn facts ---

    fn has_trait(&self, pawn: PawnId, kind: TraitKind) -> bool;
    fn is_animal(&self, pawn: PawnId) -> bool;
    fn is_hostile(&self, a: PawnId, b: PawnId) -> bool;
    fn is_player_controlled(&self, pawn: PawnId) -> bool;
    fn is_incapacitated(&self, pawn: PawnId) -> bool;
    fn core_part_max_health(&self, pawn: PawnId) -> f32;
    /// Skill level, or None when the pawn has no skill tracker.
    fn skill_level(&self, pawn: PawnId, skill: SkillKind) -> Option<u32>;
    fn inventory_kinds(&self, pawn: PawnId) -> Vec<ItemKind>;

    // --- status values ---

    fn severity(&self, pawn: PawnId, kind: HediffKind) -> Option<f32>;
    fn stage_index(&self, pawn: PawnId, kind: HediffKind) -> Option<usize>;
    /// Attach a new status value, or raise the existing one's severity.
    fn attach_hediff(&mut self, pawn: PawnId, kind: HediffKind, severity: f32);
    /// Write severity directly; the value is clamped to the kind's range.
    fn set_severity(&mut self, pawn: PawnId, kind: HediffKind, severity: f32);
    fn adjust_severity(&mut self, pawn: PawnId, kind: HediffKind, delta: f32);
    fn remove_hediff(&mut self, pawn: PawnId, kind: HediffKind);

    // --- forced-behavior modes ---

    fn current_state(&self, pawn: PawnId) -> Option<MentalStateKind>;
    /// Attempt to acquire the exclusive mode slot. False when occupied.
    fn try_start_state(&mut self, pawn: PawnId, kind: MentalStateKind) -> bool;
    fn end_state(&mut self, pawn: PawnId, kind: MentalStateKind);
    /// Put a player-controlled pawn back under direct command.
    fn draft(&mut self, pawn: PawnId);

    // --- social interaction ---

    /// Other pawns within `radius` cells, nearest first, dead excluded.
    fn pawns_in_radius(&self, pawn: PawnId, radius: f32) -> Vec<PawnId>;
    fn can_receive_interaction(&self, pawn: PawnId) -> bool;
    fn try_interact(&mut self, actor: PawnId, recipient: PawnId, kind: InteractionKind) -> bool;

    // --- targeting and jobs ---

    fn find_attack_target(&self, pawn: PawnId, policy: &TargetPolicy) -> Option<PawnId>;
    /// Whether a melee engagement option exists against the target.
    fn has_melee_option(&self, pawn: PawnId, target: PawnId) -> bool;
    fn start_job(&mut self, pawn: PawnId, job: Job);

    // --- skills and mood ---

    fn learn_skill(&mut self, pawn: PawnId, skill: SkillKind, xp: f32);
    fn gain_memory(&mut self, pawn: PawnId, kind: MemoryKind);

    // --- randomness ---

    /// Bernoulli trial with probability `p` (clamped to [0, 1]).
    fn chance(&mut self, p: f32) -> bool;
    /// Uniform draw from `lo..=hi`.
    fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32;
    /// Uniform index into a collection of `len` items; None when empty.
    fn choose(&mut self, len: usize) -> Option<usize>;
}
