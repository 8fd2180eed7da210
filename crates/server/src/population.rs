//! Entity population maintenance.
//!
//! Keeps food and viruses topped up to their target counts. Nothing here ever
//! removes entities; only consumption and feeding do that.

use crate::config::{Config, FoodConfig, VirusConfig};
use crate::entity::{Food, Virus};
use crate::world::World;

impl World {
    /// Top up both populations.
    pub fn maintain_population(&mut self, config: &Config) {
        self.spawn_food(&config.food);
        self.spawn_viruses(&config.virus);
    }

    /// Spawn food until the target amount is reached. Returns how many were spawned.
    pub fn spawn_food(&mut self, config: &FoodConfig) -> usize {
        if config.variants.is_empty() {
            return 0;
        }

        let mut spawned = 0;
        while self.food.len() < config.amount {
            let position = self.spawner.random_position(&self.border);
            let variant = config.variants[self.spawner.random_index(config.variants.len())];
            self.food.push(Food::new(position, variant.mass, variant.color));
            spawned += 1;
        }
        spawned
    }

    /// Spawn viruses at base mass until the target amount is reached.
    pub fn spawn_viruses(&mut self, config: &VirusConfig) -> usize {
        let mut spawned = 0;
        while self.viruses.len() < config.amount {
            let position = self.spawner.random_position(&self.border);
            self.viruses.push(Virus::new(position, config.base_mass, config.color));
            spawned += 1;
        }
        spawned
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::world::World;

    fn config() -> Config {
        let mut config = Config::default();
        config.server.seed = Some(3);
        config.food.amount = 200;
        config.virus.amount = 12;
        config
    }

    #[test]
    fn test_tops_up_to_target() {
        let config = config();
        let mut world = World::new(&config);
        world.maintain_population(&config);
        assert_eq!(world.food.len(), 200);
        assert_eq!(world.viruses.len(), 12);

        world.food.truncate(150);
        world.viruses.truncate(5);
        assert_eq!(world.spawn_food(&config.food), 50);
        assert_eq!(world.spawn_viruses(&config.virus), 7);
        assert_eq!(world.food.len(), 200);
        assert_eq!(world.viruses.len(), 12);
    }

    #[test]
    fn test_never_trims_excess() {
        let config = config();
        let mut world = World::new(&config);
        world.maintain_population(&config);
        let extra = world.viruses[0].clone();
        world.viruses.push(extra);
        world.maintain_population(&config);
        assert_eq!(world.viruses.len(), 13);
    }

    #[test]
    fn test_spawned_entities_match_config() {
        let config = config();
        let mut world = World::new(&config);
        world.maintain_population(&config);

        for food in &world.food {
            assert!(world.border.contains(food.position));
            assert!(config.food.variants.iter().any(|v| v.mass == food.mass && v.color == food.color));
        }
        for virus in &world.viruses {
            assert!(world.border.contains(virus.position));
            assert_eq!(virus.mass, config.virus.base_mass);
            assert_eq!(virus.feed, 0.0);
        }
    }

    #[test]
    fn test_no_variants_spawns_nothing() {
        let mut config = config();
        config.food.variants.clear();
        let mut world = World::new(&config);
        assert_eq!(world.spawn_food(&config.food), 0);
        assert!(world.food.is_empty());
    }
}
