//! Caravans
//!
//! A traveling party of pawns with a shared movement rate. The caravaneer
//! rule gets to shave the ticks-per-move.

use bevy_ecs::prelude::*;

use crate::behaviors::caravaneer::CaravanMember;
use crate::components::pawn::{Health, PawnId, Prisoner, TraitKind};
use crate::engine::{queries, PawnIndex};

/// Baseline ticks a caravan needs per world-map move.
pub const BASE_TICKS_PER_MOVE: u32 = 336;

/// A formed caravan.
#[derive(Debug, Clone)]
pub struct Caravan {
    pub members: Vec<PawnId>,
    pub base_ticks_per_move: u32,
}

impl Caravan {
    pub fn new(members: Vec<PawnId>) -> Self {
        Self {
            members,
            base_ticks_per_move: BASE_TICKS_PER_MOVE,
        }
    }
}

/// Computes the caravan's ticks-per-move, trait bonus included.
pub fn ticks_per_move(world: &World, caravan: &Caravan) -> u32 {
    let index = world.resource::<PawnIndex>();
    let members: Vec<CaravanMember> = caravan
        .members
        .iter()
        .filter_map(|id| {
            let entity = index.entity(*id)?;
            Some(CaravanMember {
                caravaneer: queries::has_trait(world, entity, TraitKind::Caravaneer),
                downed: world.get::<Health>(entity).is_some_and(|h| h.downed),
                prisoner: world.get::<Prisoner>(entity).is_some_and(|p| p.0),
            })
        })
        .collect();
    world
        .resource::<crate::Behaviors>()
        .caravaneer
        .ticks_per_move(&members, caravan.base_ticks_per_move)
}
