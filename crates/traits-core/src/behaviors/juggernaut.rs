//! Juggernaut trait: hits don't stagger and shocks don't stun. The
//! suppressed stun isn't reported either; nothing happened, as far as the
//! battle log is concerned.

use crate::components::pawn::{PawnId, TraitKind};
use crate::host::Host;

#[derive(Clone, Default)]
pub struct JuggernautRule;

impl JuggernautRule {
    pub fn new() -> Self {
        Self
    }

    /// Stagger duration after a hit; zero for Juggernauts.
    pub fn stagger_ticks(&self, host: &dyn Host, pawn: PawnId, base_ticks: u32) -> u32 {
        if host.has_trait(pawn, TraitKind::Juggernaut) {
            0
        } else {
            base_ticks
        }
    }

    /// Stun duration after a shock, and whether the stun should be
    /// reported at all.
    pub fn stun_ticks(&self, host: &dyn Host, pawn: PawnId, base_ticks: u32) -> (u32, bool) {
        if host.has_trait(pawn, TraitKind::Juggernaut) {
            (0, false)
        } else {
            (base_ticks, true)
        }
    }
}
