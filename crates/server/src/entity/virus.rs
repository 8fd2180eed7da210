//! Virus.

use super::cell::Cell;
use glam::Vec2;
use protocol::Color;

/// A virus that pops player cells and reproduces when fed.
#[derive(Debug, Clone, PartialEq)]
pub struct Virus {
    pub position: Vec2,
    pub mass: f32,
    pub color: Color,
    /// Ejected mass absorbed since the last reproduction.
    pub feed: f32,
}

impl Virus {
    /// Create a new, unfed virus.
    pub fn new(position: Vec2, mass: f32, color: Color) -> Self {
        Self {
            position,
            mass,
            color,
            feed: 0.0,
        }
    }

    /// Absorb `mass` of feed. Returns true once the threshold is reached, in
    /// which case the counter is reset.
    pub fn feed(&mut self, mass: f32, threshold: f32) -> bool {
        self.feed += mass;
        if self.feed >= threshold {
            self.feed = 0.0;
            true
        } else {
            false
        }
    }
}

impl Cell for Virus {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn mass(&self) -> f32 {
        self.mass
    }
}
