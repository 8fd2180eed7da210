//! Player state.

use super::player_cell::PlayerCell;
use glam::Vec2;
use protocol::Color;

/// A player and the cells it owns.
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique player ID.
    pub id: u32,
    pub name: String,
    pub color: Color,
    /// Owned cells, in insertion order.
    pub cells: Vec<PlayerCell>,
    /// Steering target in world coordinates.
    pub target: Vec2,
    pub alive: bool,
    pub is_spectating: bool,
    /// High-water mark of total mass; only predation lowers it.
    pub score: f32,
    /// All-time high-water mark of total mass.
    pub best: f32,
}

impl Player {
    /// Create a live player owning a single cell, steering at that cell.
    pub fn new(id: u32, name: String, color: Color, cell: PlayerCell) -> Self {
        let mass = cell.mass;
        Self {
            id,
            name,
            color,
            target: cell.position,
            cells: vec![cell],
            alive: true,
            is_spectating: false,
            score: mass,
            best: mass,
        }
    }

    /// Total mass of all owned cells.
    pub fn total_mass(&self) -> f32 {
        self.cells.iter().map(|c| c.mass).sum()
    }

    /// Raise `score` and `best` to the current total mass if it is higher.
    pub fn update_high_water(&mut self) {
        let total = self.total_mass();
        self.score = self.score.max(total);
        self.best = self.best.max(total);
    }

    /// Enter spectator state once the last cell is gone.
    pub fn check_death(&mut self) -> bool {
        if self.alive && self.cells.is_empty() {
            self.alive = false;
            self.is_spectating = true;
            return true;
        }
        false
    }

    /// Whether the tick should update this player.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.alive || self.is_spectating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_with(masses: &[f32]) -> Player {
        let mut player = Player::new(1, "p".into(), Color::default(), PlayerCell::new(1, Vec2::ZERO, masses[0], 0));
        for (i, &m) in masses.iter().enumerate().skip(1) {
            player.cells.push(PlayerCell::new(i as u32 + 1, Vec2::ZERO, m, 0));
        }
        player
    }

    #[test]
    fn test_high_water_never_decreases() {
        let mut player = player_with(&[40.0, 60.0]);
        player.update_high_water();
        assert_eq!(player.score, 100.0);
        assert_eq!(player.best, 100.0);

        player.cells[1].mass = 10.0;
        player.update_high_water();
        assert_eq!(player.score, 100.0);
        assert_eq!(player.best, 100.0);
    }

    #[test]
    fn test_check_death() {
        let mut player = player_with(&[40.0]);
        assert!(!player.check_death());
        player.cells.clear();
        assert!(player.check_death());
        assert!(!player.alive);
        assert!(player.is_spectating);
        assert!(player.is_active());
        assert!(!player.check_death());
    }
}
