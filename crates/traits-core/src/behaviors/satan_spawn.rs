//! Satan Spawn trait: doesn't close doors. Doors this pawn opens or walks
//! through get latched open and stay that way until somebody else uses
//! them.

use crate::components::map::Door;

#[derive(Clone, Default)]
pub struct SatanSpawnRule;

impl SatanSpawnRule {
    pub fn new() -> Self {
        Self
    }

    /// Whether passing this door latches it open. Only an already-open
    /// door is fair game; a closed one wasn't this pawn's to touch.
    pub fn holds_door_open(&self, pawn_has_trait: bool, door: &Door) -> bool {
        pawn_has_trait && door.open
    }

    /// Whether the pawn refuses a close attempt outright.
    pub fn refuses_to_close(&self, pawn_has_trait: bool) -> bool {
        pawn_has_trait
    }

    /// Whether a pawn passing through clears an existing latch. Anyone
    /// without the trait releases the door back to its normal countdown.
    pub fn releases_latch(&self, pawn_has_trait: bool) -> bool {
        !pawn_has_trait
    }
}
