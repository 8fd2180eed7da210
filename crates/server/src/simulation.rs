//! Tick orchestration.
//!
//! One call to [`World::step`] advances the whole world by a single tick:
//! populations, ejected pellets, virus feeding, then every active player in
//! join order.

use crate::config::Config;
use crate::interaction::{consume_ejected, consume_food, consume_viruses, decay_mass, resolve_predation};
use crate::movement::{merge_cells, move_cells};
use crate::world::World;

impl World {
    /// Advance the world by one tick at time `now` (ms).
    pub fn step(&mut self, config: &Config, now: u64) {
        self.maintain_population(config);
        self.advance_ejected(config);
        self.feed_viruses(&config.virus);

        for index in 0..self.players.len() {
            if self.players[index].is_active() {
                self.update_player(index, config, now);
            }
        }
    }

    /// Run the per-player update for the player at `index`.
    ///
    /// Order: move, food, ejected mass, viruses, merge, predation, decay,
    /// clamp, then the score high-water marks.
    pub fn update_player(&mut self, index: usize, config: &Config, now: u64) {
        let Self {
            players,
            food,
            viruses,
            ejected,
            border,
            spawner,
        } = self;
        let settings = &config.player;
        let tick_rate = config.server.tick_rate.max(1) as f32;

        {
            let Some(player) = players.get_mut(index) else {
                return;
            };
            move_cells(player, border, tick_rate, settings.impulse_damping);
            consume_food(player, food);
            consume_ejected(player, ejected, config.eject.min_margin);
            consume_viruses(player, viruses, spawner, config, now);
            merge_cells(player, now, settings.merge_impulse);
        }

        resolve_predation(players, index, settings.eat_ratio);

        let player = &mut players[index];
        decay_mass(player, settings.decay_start, settings.decay_rate);
        for cell in &mut player.cells {
            cell.position = border.clamp(cell.position);
        }
        player.update_high_water();
    }
}
