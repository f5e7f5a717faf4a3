//! Simulation time formatting.
//!
//! The simulation runs at 60 ticks per in-game second; scenario runs span
//! hours rather than years, so time is reported as day/hour pairs.
//!
//! # Example
//!
//! ```
//! use traits_events::SimTime;
//!
//! let t = SimTime::new(2500);
//! assert_eq!(t.to_string(), "day_1.hour_1");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of ticks per simulated hour.
pub const TICKS_PER_HOUR: u64 = 2_500;

/// Number of hours per simulated day.
pub const HOURS_PER_DAY: u64 = 24;

/// A point in simulation time, formatted as `day_D.hour_H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime {
    pub tick: u64,
}

impl SimTime {
    /// Creates a timestamp for the given tick.
    pub fn new(tick: u64) -> Self {
        Self { tick }
    }

    /// The simulated day, starting at 1.
    pub fn day(&self) -> u64 {
        self.tick / (TICKS_PER_HOUR * HOURS_PER_DAY) + 1
    }

    /// The hour within the current day, 0..24.
    pub fn hour(&self) -> u64 {
        (self.tick / TICKS_PER_HOUR) % HOURS_PER_DAY
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day_{}.hour_{}", self.day(), self.hour())
    }
}
