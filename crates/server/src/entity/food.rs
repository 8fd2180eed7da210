//! Food pellet.

use super::cell::Cell;
use glam::Vec2;
use protocol::Color;

/// A food pellet that can be eaten by players.
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    pub position: Vec2,
    pub mass: f32,
    pub color: Color,
}

impl Food {
    pub fn new(position: Vec2, mass: f32, color: Color) -> Self {
        Self { position, mass, color }
    }
}

impl Cell for Food {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn mass(&self) -> f32 {
        self.mass
    }
}
