//! Player cell.

use super::cell::Cell;
use glam::Vec2;

/// A cell controlled by a player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerCell {
    /// Unique cell ID.
    pub id: u32,
    pub position: Vec2,
    pub mass: f32,
    /// Earliest time (ms) at which this cell may merge with a sibling.
    pub merge_at: u64,
    /// Residual velocity added on top of steering, damped every tick.
    pub impulse: Vec2,
}

impl PlayerCell {
    /// Create a new player cell at rest.
    pub fn new(id: u32, position: Vec2, mass: f32, merge_at: u64) -> Self {
        Self {
            id,
            position,
            mass,
            merge_at,
            impulse: Vec2::ZERO,
        }
    }

    /// Set the initial impulse.
    pub fn with_impulse(mut self, impulse: Vec2) -> Self {
        self.impulse = impulse;
        self
    }

    /// Whether the merge cooldown has expired.
    #[inline]
    pub fn can_merge(&self, now: u64) -> bool {
        now >= self.merge_at
    }
}

impl Cell for PlayerCell {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn mass(&self) -> f32 {
        self.mass
    }
}
