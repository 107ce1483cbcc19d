use std::fmt;

use serde::{Deserialize, Serialize};

pub mod balance;
pub mod command;
pub mod engine;
pub mod items;
pub mod kitchen;
pub mod map;
pub mod orders;
pub mod protocol;
pub mod search;
pub mod world;

pub use command::Command;
pub use engine::{Decision, DecisionEngine};
pub use items::{Composition, Ingredient};
pub use kitchen::{Kitchen, Station};
pub use search::PlanError;
pub use world::{Chef, CustomerOrder, KitchenView, Oven, Snapshot};

/// Represents a 2D coordinate on the kitchen grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the manhattan distance between two positions.
    pub fn manhattan(&self, other: &Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Offsets this position, returning `None` if either coordinate would go negative.
    pub fn offset(&self, dx: isize, dy: isize) -> Option<Position> {
        Some(Position {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}
