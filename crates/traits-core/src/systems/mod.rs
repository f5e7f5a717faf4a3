//! Systems
//!
//! The per-tick pipeline, as exclusive systems over `&mut World`:
//! social interactions, job assignment and execution, damage application,
//! status-effect upkeep, mental-state upkeep, and door timers. Behavior
//! hooks fire inside these systems through the host adapter.

pub mod damage;
pub mod doors;
pub mod hediffs;
pub mod interactions;
pub mod jobs;
pub mod mental_states;

pub use damage::{apply_damage, DamageEvent, DamageQueue};
pub use doors::tick_doors;
pub use hediffs::tick_hediffs;
pub use interactions::social_tick;
pub use jobs::{assign_jobs, run_jobs};
pub use mental_states::tick_mental_states;
