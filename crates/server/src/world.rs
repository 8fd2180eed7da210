//! World state management.
//!
//! The [`World`] is the single owned aggregate holding every player, food
//! pellet, virus and ejected pellet. Simulation stages borrow it explicitly;
//! nothing is reachable through globals.

use crate::config::Config;
use crate::entity::{EjectedMass, Food, Player, Virus};
use crate::geometry::{clamp_to_border, unit_from_angle};
use fixedbitset::FixedBitSet;
use glam::Vec2;
use protocol::Color;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The game world containing all entities.
#[derive(Debug)]
pub struct World {
    /// Players in join order.
    pub players: Vec<Player>,
    pub food: Vec<Food>,
    pub viruses: Vec<Virus>,
    pub ejected: Vec<EjectedMass>,
    /// World border.
    pub border: WorldBorder,
    /// ID and randomness source for new entities.
    pub spawner: Spawner,
}

/// Square world border centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBorder {
    /// Side length.
    pub size: f32,
    /// Half the side length; coordinates lie in `[-half, half]`.
    pub half: f32,
    /// Pellets beyond this distance on either axis are culled.
    pub cull_bound: f32,
}

impl WorldBorder {
    pub fn new(size: f32, cull_margin: f32) -> Self {
        let half = size / 2.0;
        Self {
            size,
            half,
            cull_bound: half + cull_margin.max(0.0),
        }
    }

    /// Clamp a position into the border.
    #[inline]
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        clamp_to_border(position, self.half)
    }

    /// Whether a position lies inside the border (inclusive).
    #[inline]
    pub fn contains(&self, position: Vec2) -> bool {
        position.x.abs() <= self.half && position.y.abs() <= self.half
    }
}

/// Allocates entity IDs and owns the world RNG.
#[derive(Debug)]
pub struct Spawner {
    next_id: u32,
    rng: StdRng,
}

impl Spawner {
    /// Create a spawner; a seed makes every random draw replayable.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { next_id: 1, rng }
    }

    /// Get the next entity ID.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        if self.next_id == 0 {
            self.next_id = 1; // Skip 0
        }
        id
    }

    /// Uniformly random position within the border.
    pub fn random_position(&mut self, border: &WorldBorder) -> Vec2 {
        if border.half <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            self.rng.random_range(-border.half..border.half),
            self.rng.random_range(-border.half..border.half),
        )
    }

    /// Unit vector at a uniformly random angle.
    pub fn random_direction(&mut self) -> Vec2 {
        unit_from_angle(self.rng.random::<f32>() * std::f32::consts::TAU)
    }

    /// Uniformly random index below `len` (`len` must be non-zero).
    pub fn random_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    /// Random hue at 80% saturation and 55% lightness.
    pub fn random_player_color(&mut self) -> Color {
        Color::from_hsl(self.rng.random_range(0.0..360.0), 0.8, 0.55)
    }
}

impl World {
    /// Create an empty world from the configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            players: Vec::with_capacity(64),
            food: Vec::with_capacity(config.food.amount),
            viruses: Vec::with_capacity(config.virus.max_amount.max(config.virus.amount)),
            ejected: Vec::with_capacity(256),
            border: WorldBorder::new(config.border.size, config.border.eject_cull_margin),
            spawner: Spawner::new(config.server.seed),
        }
    }

    /// Get a player by ID.
    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Get a mutable player by ID.
    pub fn player_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Remove a player by ID, keeping the join order of the rest.
    pub fn remove_player(&mut self, id: u32) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(index))
    }

    /// Get the count of each entity type.
    #[inline]
    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            players: self.players.len(),
            cells: self.players.iter().map(|p| p.cells.len()).sum(),
            food: self.food.len(),
            viruses: self.viruses.len(),
            ejected: self.ejected.len(),
        }
    }
}

/// Entity count statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCounts {
    pub players: usize,
    pub cells: usize,
    pub food: usize,
    pub viruses: usize,
    pub ejected: usize,
}

/// Drop every item whose index is marked, preserving the order of the rest.
pub(crate) fn compact<T>(items: &mut Vec<T>, marked: &FixedBitSet) {
    if marked.count_ones(..) == 0 {
        return;
    }
    let mut index = 0;
    items.retain(|_| {
        let keep = !marked.contains(index);
        index += 1;
        keep
    });
}
