//! Character trait behaviors for a tick-driven colony simulation.
//!
//! Nine traits (Animal Friend, Berserker, Boring, Caravaneer, Drunken
//! Master, Juggernaut, Satan Spawn, Teacher, Slob) are implemented as
//! small rules over an explicit [`host::Host`] interface. The engine in
//! this crate — pawns, damage, status effects, mental states, jobs, social
//! interaction, doors — adapts that interface over a `bevy_ecs` world and
//! invokes the rules at the matching simulation points.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod behaviors;
pub mod caravan;
pub mod components;
pub mod config;
pub mod engine;
pub mod events;
pub mod host;
pub mod output;
pub mod scenario;
pub mod setup;
pub mod systems;

pub use behaviors::Behaviors;
pub use components::*;
pub use config::Config;

/// Seeded random number generator resource. Every stochastic decision in
/// the simulation draws from it, so runs are reproducible per seed.
#[derive(Resource)]
pub struct SimRng(pub SmallRng);

/// Global simulation clock resource.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SimulationState {
    pub current_tick: u64,
}
