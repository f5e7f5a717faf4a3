//! Map Components
//!
//! A small grid world: a home region, doors with close timers, doormats,
//! and tracked filth. Only what the trait behaviors need to fire.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A cell position on the map grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another cell.
    pub fn distance_to(&self, other: Coord) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// True when the cells are orthogonally or diagonally adjacent.
    pub fn adjacent_to(&self, other: Coord) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx <= 1 && dy <= 1 && (dx + dy) > 0
    }

    /// One step from `self` toward `target` (diagonals allowed).
    pub fn step_toward(&self, target: Coord) -> Coord {
        Coord {
            x: self.x + (target.x - self.x).signum(),
            y: self.y + (target.y - self.y).signum(),
        }
    }

    /// One step from `self` directly away from `target`.
    pub fn step_away_from(&self, target: Coord) -> Coord {
        Coord {
            x: self.x - (target.x - self.x).signum(),
            y: self.y - (target.y - self.y).signum(),
        }
    }
}

/// A door cell. Opens when a pawn passes through and closes again after a
/// delay, unless latched open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Door {
    pub position: Coord,
    pub open: bool,
    /// Latched doors never count down; the latch clears when a pawn without
    /// the latching trait passes through.
    pub held_open: bool,
    pub ticks_until_close: u32,
}

impl Door {
    pub fn new(position: Coord) -> Self {
        Self {
            position,
            open: false,
            held_open: false,
            ticks_until_close: 0,
        }
    }
}

/// A doormat cell. Wipes tracked dirt from pawns stepping on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doormat {
    pub position: Coord,
}

/// The map: bounds, home region, doors, doormats, and accumulated filth.
#[derive(Resource, Debug, Clone)]
pub struct Map {
    pub width: i32,
    pub height: i32,
    /// Inclusive rectangle (min, max) considered "indoors".
    pub home_min: Coord,
    pub home_max: Coord,
    pub doors: Vec<Door>,
    pub doormats: Vec<Doormat>,
    /// Filth deposited per cell, in a stable order so summation is
    /// reproducible.
    pub filth: BTreeMap<Coord, f32>,
}

impl Map {
    pub fn new(width: i32, height: i32, home_min: Coord, home_max: Coord) -> Self {
        Self {
            width,
            height,
            home_min,
            home_max,
            doors: Vec::new(),
            doormats: Vec::new(),
            filth: BTreeMap::new(),
        }
    }

    /// Clamps a coordinate to the map bounds.
    pub fn clamp(&self, c: Coord) -> Coord {
        Coord {
            x: c.x.clamp(0, self.width - 1),
            y: c.y.clamp(0, self.height - 1),
        }
    }

    pub fn is_indoors(&self, c: Coord) -> bool {
        c.x >= self.home_min.x
            && c.x <= self.home_max.x
            && c.y >= self.home_min.y
            && c.y <= self.home_max.y
    }

    pub fn door_at(&self, c: Coord) -> Option<&Door> {
        self.doors.iter().find(|d| d.position == c)
    }

    pub fn door_at_mut(&mut self, c: Coord) -> Option<&mut Door> {
        self.doors.iter_mut().find(|d| d.position == c)
    }

    pub fn doormat_at(&self, c: Coord) -> bool {
        self.doormats.iter().any(|m| m.position == c)
    }

    pub fn deposit_filth(&mut self, c: Coord, amount: f32) {
        *self.filth.entry(c).or_insert(0.0) += amount;
    }

    pub fn total_filth(&self) -> f32 {
        self.filth.values().sum()
    }
}
