//! Common behaviour of every positioned, mass-bearing body.

use crate::geometry::{distance, radius_from_mass};
use glam::Vec2;

/// Trait for all bodies in the world.
pub trait Cell {
    /// Position in world coordinates.
    fn position(&self) -> Vec2;

    /// Current mass.
    fn mass(&self) -> f32;

    /// Radius derived from mass; never stored.
    #[inline]
    fn radius(&self) -> f32 {
        radius_from_mass(self.mass())
    }

    /// Whether `other`'s center lies within this body's radius.
    #[inline]
    fn covers(&self, other: &impl Cell) -> bool {
        distance(self.position(), other.position()) <= self.radius()
    }
}
