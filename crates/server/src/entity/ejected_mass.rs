//! Ejected mass pellet.

use super::cell::Cell;
use glam::Vec2;
use protocol::Color;

/// Mass ejected by a player. The color is the ejecting player's, nothing more.
#[derive(Debug, Clone, PartialEq)]
pub struct EjectedMass {
    pub id: u32,
    pub position: Vec2,
    pub mass: f32,
    /// Velocity in units per second, damped every tick.
    pub velocity: Vec2,
    pub color: Color,
}

impl EjectedMass {
    pub fn new(id: u32, position: Vec2, mass: f32, velocity: Vec2, color: Color) -> Self {
        Self {
            id,
            position,
            mass,
            velocity,
            color,
        }
    }
}

impl Cell for EjectedMass {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn mass(&self) -> f32 {
        self.mass
    }
}
