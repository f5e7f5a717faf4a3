//! Components
//!
//! Plain-data building blocks of the pawn world: identity, body, status
//! effects, mental states, jobs, and the map.

pub mod hediff;
pub mod job;
pub mod map;
pub mod mental_state;
pub mod pawn;

pub use hediff::{Hediff, HediffKind, HediffSet, HediffStage};
pub use job::{CurrentJob, Job, JobKind};
pub use map::{Coord, Door, Doormat, Map};
pub use mental_state::{MentalState, MentalStateKind, MentalStateSlot};
pub use pawn::{
    BodySize, Drafted, FactionKind, Health, Inventory, ItemKind, MemoryKind, Mobility, Mood, Pawn,
    PawnId, PawnKind, PawnName, Position, Prisoner, Skill, SkillKind, Skills, TrackedDirt,
    TraitKind, TraitSet,
};
