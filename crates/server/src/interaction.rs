//! Interactions between a player's cells and the rest of the world.
//!
//! Removals are marked in a bitset while scanning and compacted afterwards,
//! so indices stay valid for the whole pass.

use crate::actions::fragment_cell;
use crate::config::Config;
use crate::entity::{Cell, EjectedMass, Food, Player, Virus};
use crate::geometry::distance;
use crate::world::{compact, Spawner};
use fixedbitset::FixedBitSet;
use tracing::debug;

/// Let every cell eat the food it covers. Returns the number eaten.
pub fn consume_food(player: &mut Player, food: &mut Vec<Food>) -> usize {
    let mut eaten = FixedBitSet::with_capacity(food.len());
    for cell in &mut player.cells {
        for (i, pellet) in food.iter().enumerate() {
            if eaten.contains(i) || !cell.covers(pellet) {
                continue;
            }
            cell.mass += pellet.mass;
            player.score += pellet.mass;
            eaten.insert(i);
        }
    }

    let count = eaten.count_ones(..);
    compact(food, &eaten);
    count
}

/// Let every cell eat the ejected pellets it covers, provided the cell
/// outweighs the pellet by more than `margin`. Returns the number eaten.
pub fn consume_ejected(player: &mut Player, ejected: &mut Vec<EjectedMass>, margin: f32) -> usize {
    let mut eaten = FixedBitSet::with_capacity(ejected.len());
    for cell in &mut player.cells {
        for (i, pellet) in ejected.iter().enumerate() {
            if eaten.contains(i) || cell.mass <= pellet.mass + margin || !cell.covers(pellet) {
                continue;
            }
            cell.mass += pellet.mass;
            player.score += pellet.mass;
            eaten.insert(i);
        }
    }

    let count = eaten.count_ones(..);
    compact(ejected, &eaten);
    count
}

/// Resolve contact between a player's cells and viruses.
///
/// A cell heavy enough eats the virus for a bonus; otherwise the virus pops
/// it into fragments and knocks its mass down. The virus is removed in both
/// cases. Fragments created here are not checked against other viruses until
/// the next tick. Returns the number of viruses removed.
pub fn consume_viruses(
    player: &mut Player,
    viruses: &mut Vec<Virus>,
    spawner: &mut Spawner,
    config: &Config,
    now: u64,
) -> usize {
    let settings = &config.virus;
    let mut removed = FixedBitSet::with_capacity(viruses.len());
    let existing = player.cells.len();

    for index in 0..existing {
        for (i, virus) in viruses.iter().enumerate() {
            if removed.contains(i) {
                continue;
            }
            let cell = &mut player.cells[index];
            if !cell.covers(virus) {
                continue;
            }
            removed.insert(i);

            if cell.mass > virus.mass * settings.eat_factor {
                let reward = virus.mass * settings.reward;
                cell.mass += reward;
                player.score += reward;
            } else {
                let mass = cell.mass;
                let extra = if settings.pop_mass_per_part > 0.0 {
                    (mass / settings.pop_mass_per_part).floor() as usize
                } else {
                    0
                };
                let parts = settings.pop_base_parts.saturating_add(extra);
                let created = fragment_cell(player, index, parts, spawner, config, now);
                player.cells[index].mass = (mass * settings.pop_keep_ratio).max(config.player.start_mass);
                debug!("Player {} popped into {} fragments", player.id, created);
            }
        }
    }

    let count = removed.count_ones(..);
    compact(viruses, &removed);
    count
}

/// Let the player at `attacker` eat the cells of every other living player
/// that it covers and sufficiently outweighs.
///
/// Victims lose score equal to the eaten mass and become spectators when
/// their last cell is gone. Returns the number of cells eaten.
pub fn resolve_predation(players: &mut [Player], attacker: usize, eat_ratio: f32) -> usize {
    let mut total = 0;
    for victim in 0..players.len() {
        if victim == attacker {
            continue;
        }
        let (hunter, prey) = pair_mut(players, attacker, victim);
        if !prey.alive || hunter.cells.is_empty() {
            continue;
        }

        let mut eaten = FixedBitSet::with_capacity(prey.cells.len());
        for cell in &mut hunter.cells {
            for (i, target) in prey.cells.iter().enumerate() {
                if eaten.contains(i) {
                    continue;
                }
                if distance(cell.position, target.position) < cell.radius()
                    && cell.mass > target.mass * eat_ratio
                {
                    cell.mass += target.mass;
                    prey.score = (prey.score - target.mass).max(0.0);
                    eaten.insert(i);
                }
            }
        }

        total += eaten.count_ones(..);
        compact(&mut prey.cells, &eaten);
        if prey.check_death() {
            debug!("Player {} was eaten by player {}", prey.id, hunter.id);
        }
    }
    total
}

/// Shrink cells above `start` by `rate` of their mass, never below `start`.
pub fn decay_mass(player: &mut Player, start: f32, rate: f32) {
    for cell in &mut player.cells {
        if cell.mass > start {
            cell.mass = (cell.mass * (1.0 - rate)).max(start);
        }
    }
}

/// Borrow two distinct players mutably.
fn pair_mut(players: &mut [Player], a: usize, b: usize) -> (&mut Player, &mut Player) {
    if a < b {
        let (left, right) = players.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = players.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
