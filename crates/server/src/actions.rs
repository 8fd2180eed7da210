//! Player actions: join, respawn, steering, split and eject, plus the
//! fragmentation used when a virus pops a cell.

use crate::config::Config;
use crate::entity::{Cell, EjectedMass, Player, PlayerCell};
use crate::geometry::{heading, radius_from_mass};
use crate::world::{Spawner, World};
use glam::Vec2;
use tracing::debug;

impl World {
    /// Add a new player with a single starting cell at a random position.
    ///
    /// Missing names fall back to the configured default; long names are
    /// truncated. Returns the new player's ID.
    pub fn join(&mut self, name: Option<&str>, config: &Config, now: u64) -> u32 {
        let name = sanitize_name(name, config);
        let id = self.spawner.next_id();
        let cell_id = self.spawner.next_id();
        let position = self.spawner.random_position(&self.border);
        let color = self.spawner.random_player_color();

        let cell = PlayerCell::new(cell_id, position, config.player.start_mass, now);
        self.players.push(Player::new(id, name, color, cell));
        debug!("Player {} joined at ({:.0}, {:.0})", id, position.x, position.y);
        id
    }

    /// Replace a player with a fresh one, keeping the old name unless a new one is given.
    ///
    /// Returns `None` if the player does not exist.
    pub fn respawn(&mut self, id: u32, name: Option<&str>, config: &Config, now: u64) -> Option<u32> {
        let old = self.remove_player(id)?;
        let name = name.unwrap_or(old.name.as_str());
        Some(self.join(Some(name), config, now))
    }

    /// Set a player's steering target.
    pub fn set_target(&mut self, id: u32, x: f32, y: f32) {
        if let Some(player) = self.player_mut(id) {
            player.target = Vec2::new(x, y);
        }
    }

    /// Split every eligible cell of a player toward its steering target.
    ///
    /// Returns the number of new cells.
    pub fn split(&mut self, id: u32, config: &Config, now: u64) -> usize {
        let Self { players, spawner, border, .. } = self;
        let Some(player) = players.iter_mut().find(|p| p.id == id) else {
            return 0;
        };

        let settings = &config.player;
        let merge_at = now + settings.recombine_delay_ms;
        let existing = player.cells.len();
        let mut siblings = Vec::new();

        for cell in &mut player.cells[..existing] {
            if cell.mass < settings.split_min_mass || existing + siblings.len() >= settings.max_cells {
                continue;
            }

            let half = cell.mass / 2.0;
            cell.mass = half;
            let direction = heading(cell.position, player.target);
            let position = border.clamp(cell.position + direction * radius_from_mass(half) * 2.0);
            cell.impulse -= direction * settings.split_impulse * settings.split_recoil;
            cell.merge_at = merge_at;

            siblings.push(
                PlayerCell::new(spawner.next_id(), position, half, merge_at)
                    .with_impulse(direction * settings.split_impulse),
            );
        }

        let added = siblings.len();
        player.cells.extend(siblings);
        added
    }

    /// Eject a pellet from every cell heavy enough to spare it.
    ///
    /// Returns the number of pellets ejected.
    pub fn eject(&mut self, id: u32, config: &Config) -> usize {
        let Self { players, spawner, ejected, .. } = self;
        let Some(player) = players.iter_mut().find(|p| p.id == id) else {
            return 0;
        };

        let settings = &config.eject;
        let mut count = 0;
        for cell in &mut player.cells {
            if cell.mass <= settings.mass + settings.min_margin {
                continue;
            }

            cell.mass -= settings.mass;
            let direction = heading(cell.position, player.target);
            ejected.push(EjectedMass::new(
                spawner.next_id(),
                cell.position + direction * cell.radius(),
                settings.mass,
                direction * settings.speed,
                player.color,
            ));
            count += 1;
        }
        count
    }
}

/// Trim, default and truncate a display name.
fn sanitize_name(name: Option<&str>, config: &Config) -> String {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    match name {
        Some(name) => name.chars().take(config.server.max_name_length).collect(),
        None => config.player.default_name.clone(),
    }
}

/// Break the cell at `index` into up to `parts` pieces scattered at random angles.
///
/// Each fragment weighs `max(mass / parts, start_mass / 2)` and gets its own
/// recombination delay. Fragments that would push the player past the cell cap
/// are dropped. The origin cell's mass is left to the caller. Returns the
/// number of fragments created.
pub fn fragment_cell(
    player: &mut Player,
    index: usize,
    parts: usize,
    spawner: &mut Spawner,
    config: &Config,
    now: u64,
) -> usize {
    let settings = &config.player;
    let Some(origin) = player.cells.get_mut(index) else {
        return 0;
    };

    let merge_at = now + settings.recombine_delay_ms;
    origin.merge_at = merge_at;
    let position = origin.position;
    let mass = origin.mass;
    let mass_per = (mass / parts.max(1) as f32).max(settings.start_mass / 2.0);
    let reach = radius_from_mass(mass);

    let mut created = 0;
    for _ in 1..parts {
        if player.cells.len() >= settings.max_cells {
            break;
        }
        let direction = spawner.random_direction();
        player.cells.push(
            PlayerCell::new(spawner.next_id(), position + direction * reach, mass_per, merge_at)
                .with_impulse(direction * config.virus.fragment_impulse),
        );
        created += 1;
    }
    created
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        let mut config = Config::default();
        config.server.seed = Some(11);
        config.food.amount = 0;
        config.virus.amount = 0;
        config
    }

    #[test]
    fn test_join_defaults() {
        let config = config();
        let mut world = World::new(&config);
        let id = world.join(None, &config, 500);
        let player = world.player(id).unwrap();

        assert_eq!(player.name, "Anon");
        assert!(player.alive);
        assert!(!player.is_spectating);
        assert_eq!(player.cells.len(), 1);
        assert_eq!(player.cells[0].mass, 40.0);
        assert_eq!(player.cells[0].merge_at, 500);
        assert_eq!(player.target, player.cells[0].position);
        assert_eq!(player.score, 40.0);
        assert!(world.border.contains(player.cells[0].position));
    }

    #[test]
    fn test_join_truncates_name() {
        let mut config = config();
        config.server.max_name_length = 5;
        let mut world = World::new(&config);
        let id = world.join(Some("  abcdefgh "), &config, 0);
        assert_eq!(world.player(id).unwrap().name, "abcde");

        let id = world.join(Some("   "), &config, 0);
        assert_eq!(world.player(id).unwrap().name, "Anon");
    }

    #[test]
    fn test_respawn_reuses_name() {
        let config = config();
        let mut world = World::new(&config);
        let id = world.join(Some("alice"), &config, 0);

        let new_id = world.respawn(id, None, &config, 0).unwrap();
        assert_ne!(id, new_id);
        assert!(world.player(id).is_none());
        assert_eq!(world.player(new_id).unwrap().name, "alice");
        assert_eq!(world.players.len(), 1);

        let renamed = world.respawn(new_id, Some("bob"), &config, 0).unwrap();
        assert_eq!(world.player(renamed).unwrap().name, "bob");
        assert!(world.respawn(9999, None, &config, 0).is_none());
    }

    #[test]
    fn test_split_halves_mass() {
        let config = config();
        let mut world = World::new(&config);
        let id = world.join(None, &config, 0);
        {
            let player = world.player_mut(id).unwrap();
            player.cells[0].position = Vec2::ZERO;
            player.cells[0].mass = 100.0;
            player.target = Vec2::new(500.0, 0.0);
        }

        assert_eq!(world.split(id, &config, 1_000), 1);
        let player = world.player(id).unwrap();
        assert_eq!(player.cells.len(), 2);
        assert_eq!(player.total_mass(), 100.0);

        let (origin, sibling) = (&player.cells[0], &player.cells[1]);
        assert_eq!(origin.mass, 50.0);
        assert_eq!(sibling.mass, 50.0);
        assert_eq!(origin.merge_at, 8_000);
        assert_eq!(sibling.merge_at, 8_000);
        assert!((sibling.position.x - radius_from_mass(50.0) * 2.0).abs() < 1e-3);
        assert!((sibling.impulse.x - 7.5).abs() < 1e-5);
        assert!((origin.impulse.x + 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_split_respects_min_mass_and_cap() {
        let mut config = config();
        config.player.max_cells = 3;
        let mut world = World::new(&config);
        let id = world.join(None, &config, 0);
        world.player_mut(id).unwrap().cells[0].mass = 29.0;
        assert_eq!(world.split(id, &config, 0), 0);

        world.player_mut(id).unwrap().cells[0].mass = 400.0;
        assert_eq!(world.split(id, &config, 0), 1);
        assert_eq!(world.split(id, &config, 0), 1);
        assert_eq!(world.player(id).unwrap().cells.len(), 3);
        assert_eq!(world.split(id, &config, 0), 0);
        assert_eq!(world.player(id).unwrap().total_mass(), 400.0);
    }

    #[test]
    fn test_eject() {
        let config = config();
        let mut world = World::new(&config);
        let id = world.join(None, &config, 0);
        {
            let player = world.player_mut(id).unwrap();
            player.cells[0].position = Vec2::ZERO;
            player.cells[0].mass = 17.0;
            player.target = Vec2::new(0.0, 100.0);
        }
        assert_eq!(world.eject(id, &config), 0);

        world.player_mut(id).unwrap().cells[0].mass = 50.0;
        assert_eq!(world.eject(id, &config), 1);
        let player = world.player(id).unwrap();
        assert_eq!(player.cells[0].mass, 38.0);

        let pellet = &world.ejected[0];
        assert_eq!(pellet.mass, 12.0);
        assert_eq!(pellet.color, player.color);
        assert!((pellet.position.y - radius_from_mass(38.0)).abs() < 1e-3);
        assert!((pellet.velocity.y - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_unknown_player_actions_are_noops() {
        let config = config();
        let mut world = World::new(&config);
        assert_eq!(world.split(42, &config, 0), 0);
        assert_eq!(world.eject(42, &config), 0);
        world.set_target(42, 1.0, 1.0);
        assert!(world.players.is_empty());
    }

    #[test]
    fn test_fragment_caps_cell_count() {
        let mut config = config();
        config.player.max_cells = 4;
        let mut spawner = Spawner::new(Some(5));
        let cell = PlayerCell::new(1, Vec2::ZERO, 110.0, 0);
        let mut player = Player::new(1, "p".into(), protocol::Color::default(), cell);

        let created = fragment_cell(&mut player, 0, 9, &mut spawner, &config, 100);
        assert_eq!(created, 3);
        assert_eq!(player.cells.len(), 4);
        assert_eq!(player.cells[0].merge_at, 7_100);
        for fragment in &player.cells[1..] {
            assert_eq!(fragment.mass, 20.0);
            assert_eq!(fragment.merge_at, 7_100);
            let offset = fragment.position.length();
            assert!((offset - radius_from_mass(110.0)).abs() < 1e-3);
        }
    }
}
