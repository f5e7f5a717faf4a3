//! Animal Friend trait: animals and the pawn cannot target each other.
//! Hostility between the two is suppressed, predators skip the pawn as
//! prey, violent actions between them are blocked, and actually harming an
//! animal leaves the pawn with a guilty memory.

use crate::components::pawn::{MemoryKind, PawnId, TraitKind};
use crate::host::{DamageInfo, Host};

#[derive(Clone, Default)]
pub struct AnimalFriendRule;

impl AnimalFriendRule {
    pub fn new() -> Self {
        Self
    }

    /// The core predicate: one side is an animal and the other an Animal
    /// Friend. Used to suppress hostility, veto prey selection, and block
    /// violent orders, in both directions.
    pub fn pacifies(
        &self,
        a_is_animal: bool,
        a_is_friend: bool,
        b_is_animal: bool,
        b_is_friend: bool,
    ) -> bool {
        (a_is_animal && b_is_friend) || (b_is_animal && a_is_friend)
    }

    /// Host-facts convenience wrapper around [`Self::pacifies`].
    pub fn blocks_violence(&self, host: &dyn Host, attacker: PawnId, target: PawnId) -> bool {
        self.pacifies(
            host.is_animal(attacker),
            host.has_trait(attacker, TraitKind::AnimalFriend),
            host.is_animal(target),
            host.has_trait(target, TraitKind::AnimalFriend),
        )
    }

    /// Post-damage hook: an Animal Friend who harms an animal anyway gains
    /// the hurt-animal memory. Execution-style kills are exempt (mercy
    /// kills shouldn't read as cruelty). Returns true when a memory was
    /// inflicted.
    pub fn on_damage(&self, host: &mut dyn Host, victim: PawnId, dinfo: &DamageInfo) -> bool {
        if dinfo.amount <= 0.0 || !host.is_animal(victim) || dinfo.kind.is_execution() {
            return false;
        }
        let Some(instigator) = dinfo.instigator else {
            return false;
        };
        if !host.has_trait(instigator, TraitKind::AnimalFriend) {
            return false;
        }
        host.gain_memory(instigator, MemoryKind::HurtAnimal);
        true
    }
}
