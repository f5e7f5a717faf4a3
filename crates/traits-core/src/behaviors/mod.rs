//! Trait Behaviors
//!
//! One module per trait. Each rule is a small struct built from its config
//! sub-struct and driven entirely through the [`Host`](crate::host::Host)
//! seam, so the same code runs against the engine adapter and the fake
//! host in tests.

use bevy_ecs::prelude::*;

use crate::config::Config;

pub mod animal_friend;
pub mod berserker;
pub mod boring;
pub mod caravaneer;
pub mod drunken_master;
pub mod juggernaut;
pub mod satan_spawn;
pub mod slob;
pub mod teacher;

pub use animal_friend::AnimalFriendRule;
pub use berserker::{BerserkerRule, IreResponse};
pub use boring::BoringRule;
pub use caravaneer::CaravaneerRule;
pub use drunken_master::DrunkenMasterRule;
pub use juggernaut::JuggernautRule;
pub use satan_spawn::SatanSpawnRule;
pub use slob::SlobRule;
pub use teacher::TeacherRule;

/// All behavior rules, constructed once from configuration and registered
/// as a world resource at startup.
#[derive(Resource, Clone)]
pub struct Behaviors {
    pub animal_friend: AnimalFriendRule,
    pub berserker: BerserkerRule,
    pub boring: BoringRule,
    pub caravaneer: CaravaneerRule,
    pub drunken_master: DrunkenMasterRule,
    pub juggernaut: JuggernautRule,
    pub satan_spawn: SatanSpawnRule,
    pub slob: SlobRule,
    pub teacher: TeacherRule,
}

impl Behaviors {
    pub fn from_config(config: &Config) -> Self {
        Self {
            animal_friend: AnimalFriendRule::new(),
            berserker: BerserkerRule::new(config.berserker.clone()),
            boring: BoringRule::new(config.boring.clone()),
            caravaneer: CaravaneerRule::new(config.caravaneer.clone()),
            drunken_master: DrunkenMasterRule::new(config.drunken_master.clone()),
            juggernaut: JuggernautRule::new(),
            satan_spawn: SatanSpawnRule::new(),
            slob: SlobRule::new(config.extensions.doormats),
            teacher: TeacherRule::new(config.teacher.clone()),
        }
    }
}
