//! Boring trait: being talked at by a Boring pawn builds up the Bored
//! status, with per-interaction-kind factors. Thoroughly stupefied pawns
//! may doze off on the spot.

use crate::components::hediff::HediffKind;
use crate::components::mental_state::MentalStateKind;
use crate::components::pawn::{PawnId, TraitKind};
use crate::config::BoringConfig;
use crate::host::{Host, InteractionKind};

#[derive(Clone)]
pub struct BoringRule {
    cfg: BoringConfig,
}

impl BoringRule {
    pub fn new(cfg: BoringConfig) -> Self {
        Self { cfg }
    }

    /// Post-interaction hook on the initiator's side. Returns the severity
    /// inflicted, if any. Boring pawns don't find each other boring.
    pub fn after_interaction(
        &self,
        host: &mut dyn Host,
        actor: PawnId,
        recipient: PawnId,
        kind: InteractionKind,
    ) -> Option<f32> {
        if !host.has_trait(actor, TraitKind::Boring) {
            return None;
        }
        if host.has_trait(recipient, TraitKind::Boring) {
            return None;
        }
        let severity = self.cfg.severity * self.cfg.factor(kind);
        host.attach_hediff(recipient, HediffKind::Bored, severity);
        Some(severity)
    }

    /// Fixed-cadence check, driven by the status decay interval: a pawn in
    /// the top Bored stage may doze off. Silent no-op when the roll misses
    /// or the mode slot is occupied.
    pub fn doze_tick(&self, host: &mut dyn Host, pawn: PawnId) -> bool {
        let stages = HediffKind::Bored.stages();
        match host.stage_index(pawn, HediffKind::Bored) {
            Some(stage) if stage == stages.len() - 1 => {}
            _ => return false,
        }
        if !host.chance(self.cfg.doze_chance) {
            return false;
        }
        host.try_start_state(pawn, MentalStateKind::Dozing)
    }
}
