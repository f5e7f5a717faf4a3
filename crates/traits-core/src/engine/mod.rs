//! Engine
//!
//! The adapter layer between the ECS world and the behavior rules: the
//! [`Host`](crate::host::Host) implementation over `&mut World`, the pawn
//! id index, and shared world queries.

use bevy_ecs::prelude::*;
use std::collections::HashMap;

use crate::components::pawn::PawnId;

pub mod host_adapter;
pub mod queries;

pub use host_adapter::EcsHost;

/// Id-to-entity index plus the id counter. Dead pawns stay registered so
/// late events can still name them.
#[derive(Resource, Default)]
pub struct PawnIndex {
    entities: HashMap<PawnId, Entity>,
    next_id: u64,
}

impl PawnIndex {
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            next_id: 1,
        }
    }

    /// Allocate the next pawn id.
    pub fn allocate(&mut self) -> PawnId {
        let id = PawnId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn register(&mut self, id: PawnId, entity: Entity) {
        self.entities.insert(id, entity);
    }

    pub fn entity(&self, id: PawnId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = PawnId> + '_ {
        self.entities.keys().copied()
    }
}
