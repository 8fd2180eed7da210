//! Cell movement, impulse decay and sibling merging.

use crate::config::Config;
use crate::entity::{Cell, Player};
use crate::geometry::{distance, heading, speed_from_mass, steering_direction};
use crate::world::{compact, World, WorldBorder};
use fixedbitset::FixedBitSet;

/// Share of the smaller cell's radius added to the larger one's when testing merge range.
const MERGE_REACH: f32 = 0.2;

/// Move every cell of `player` one tick toward its steering target.
///
/// Displacement is the steering step plus the residual impulse; the impulse is
/// then damped and the cell clamped into the border.
pub fn move_cells(player: &mut Player, border: &WorldBorder, tick_rate: f32, damping: f32) {
    let cell_count = player.cells.len();
    let target = player.target;
    for cell in &mut player.cells {
        let direction = steering_direction(cell.position, target);
        let speed = speed_from_mass(cell.mass, cell_count) / tick_rate;
        cell.position += direction * speed + cell.impulse;
        cell.impulse *= damping;
        cell.position = border.clamp(cell.position);
    }
}

/// Merge sibling cells whose cooldowns have expired and which overlap enough.
///
/// The heavier cell (the earlier one on equal mass) absorbs the other and gets
/// a small nudge toward the steering target. Returns the number of merges.
pub fn merge_cells(player: &mut Player, now: u64, merge_impulse: f32) -> usize {
    let count = player.cells.len();
    if count < 2 {
        return 0;
    }

    let target = player.target;
    let mut merged = FixedBitSet::with_capacity(count);
    for i in 0..count {
        for j in (i + 1)..count {
            if merged.contains(i) {
                break;
            }
            if merged.contains(j) {
                continue;
            }

            let (a, b) = (&player.cells[i], &player.cells[j]);
            if !a.can_merge(now) || !b.can_merge(now) {
                continue;
            }

            let (recipient, donor) = if a.mass >= b.mass { (i, j) } else { (j, i) };
            let reach = player.cells[recipient].radius() + player.cells[donor].radius() * MERGE_REACH;
            if distance(a.position, b.position) >= reach {
                continue;
            }

            let donor_mass = player.cells[donor].mass;
            let cell = &mut player.cells[recipient];
            cell.mass += donor_mass;
            cell.impulse += heading(cell.position, target) * merge_impulse;
            merged.insert(donor);
        }
    }

    let merges = merged.count_ones(..);
    compact(&mut player.cells, &merged);
    merges
}

impl World {
    /// Advance ejected pellets: apply velocity, damp it, cull pellets that
    /// drifted past the cull bound and clamp the rest into the border.
    pub fn advance_ejected(&mut self, config: &Config) {
        let tick_rate = config.server.tick_rate.max(1) as f32;
        let damping = config.eject.damping;
        let border = self.border;

        for pellet in &mut self.ejected {
            pellet.position += pellet.velocity / tick_rate;
            pellet.velocity *= damping;
        }
        self.ejected.retain(|p| {
            p.position.x.abs() < border.cull_bound && p.position.y.abs() < border.cull_bound
        });
        for pellet in &mut self.ejected {
            pellet.position = border.clamp(pellet.position);
        }
    }
}
