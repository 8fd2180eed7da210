//! Geometry helpers shared by every simulation stage.
//!
//! - Radius and speed as functions of mass
//! - Steering directions with a safe fallback for zero-length vectors
//! - World border clamping

use glam::Vec2;

/// Radius multiplier: `radius = sqrt(mass) * 4`.
pub const RADIUS_FACTOR: f32 = 4.0;

// Speed curve constants
const SPEED_BASE: f32 = 340.0;
const SPEED_MASS_OFFSET: f32 = 14.0;
const SPEED_FLOOR: f32 = 22.0;
const SPEED_BONUS: f32 = 0.35;
const SPEED_PENALTY_PER_CELL: f32 = 0.015;
const SPEED_PENALTY_CAP: f32 = 0.25;

/// Distance between two points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Radius of a body of the given mass.
#[inline]
pub fn radius_from_mass(mass: f32) -> f32 {
    mass.max(0.0).sqrt() * RADIUS_FACTOR
}

/// Speed in units per second for a cell of `mass` owned by a player with
/// `cell_count` cells. Bigger cells are slower, more cells are mildly slower,
/// and nothing drops below the floor speed.
#[inline]
pub fn speed_from_mass(mass: f32, cell_count: usize) -> f32 {
    let base = SPEED_BASE / (mass.max(0.0) + SPEED_MASS_OFFSET).sqrt();
    let penalty = (cell_count as f32 * SPEED_PENALTY_PER_CELL).min(SPEED_PENALTY_CAP);
    let multiplier = 1.0 + (SPEED_BONUS - penalty).max(0.0);
    (base * multiplier).max(SPEED_FLOOR)
}

/// Unit direction from `from` toward `to`, or zero when the points coincide.
#[inline]
pub fn steering_direction(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    let length = delta.length();
    let length = if length > 0.0 { length } else { 1.0 };
    delta / length
}

/// Unit vector at the angle from `from` toward `to` (angle 0 when they coincide).
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    unit_from_angle(delta.y.atan2(delta.x))
}

#[inline]
pub fn unit_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Clamp a point into the square `[-half_size, half_size]` on both axes.
#[inline]
pub fn clamp_to_border(position: Vec2, half_size: f32) -> Vec2 {
    position.clamp(Vec2::splat(-half_size), Vec2::splat(half_size))
}

/// Round to one decimal place for snapshots.
#[inline]
pub fn quantize(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_from_mass() {
        assert_eq!(radius_from_mass(100.0), 40.0);
        assert_eq!(radius_from_mass(0.0), 0.0);
        assert_eq!(radius_from_mass(-5.0), 0.0);
    }

    #[test]
    fn test_speed_from_mass() {
        // 340 / sqrt(54) * (1 + 0.35 - 0.015)
        let expected = 340.0 / 54.0_f32.sqrt() * 1.335;
        assert!((speed_from_mass(40.0, 1) - expected).abs() < 0.001);

        // Penalty is capped at 0.25, leaving a 0.1 bonus.
        let capped = 340.0 / 54.0_f32.sqrt() * 1.1;
        assert!((speed_from_mass(40.0, 16) - capped).abs() < 0.001);
        assert!((speed_from_mass(40.0, 100) - capped).abs() < 0.001);

        // Huge cells bottom out at the floor.
        assert_eq!(speed_from_mass(1_000_000.0, 1), 22.0);
        assert!(speed_from_mass(50.0, 1) > speed_from_mass(500.0, 1));
    }

    #[test]
    fn test_steering_direction_zero_length() {
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(steering_direction(p, p), Vec2::ZERO);

        let dir = steering_direction(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((dir - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn test_heading_defaults_to_positive_x() {
        let p = Vec2::new(-2.0, 9.0);
        assert!((heading(p, p) - Vec2::X).length() < 1e-6);
        assert!((heading(Vec2::ZERO, Vec2::new(-5.0, 0.0)) + Vec2::X).length() < 1e-6);
    }

    #[test]
    fn test_clamp_to_border() {
        let clamped = clamp_to_border(Vec2::new(4000.0, -3600.0), 3500.0);
        assert_eq!(clamped, Vec2::new(3500.0, -3500.0));
        let inside = Vec2::new(10.0, -10.0);
        assert_eq!(clamp_to_border(inside, 3500.0), inside);
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(12.34), 12.3);
        assert_eq!(quantize(-7.06), -7.1);
        assert_eq!(quantize(40.0), 40.0);
    }
}
