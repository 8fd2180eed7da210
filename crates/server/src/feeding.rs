//! Virus feeding and reproduction.

use crate::config::VirusConfig;
use crate::entity::{Cell, Virus};
use crate::world::{compact, World};
use fixedbitset::FixedBitSet;
use tracing::debug;

impl World {
    /// Feed ejected pellets to the viruses that cover them.
    ///
    /// Each pellet is absorbed by the first covering virus. A virus that
    /// reaches the shoot threshold spawns a sibling at a random angle, unless
    /// the population is already at its hard cap. Returns the number of
    /// viruses spawned.
    pub fn feed_viruses(&mut self, config: &VirusConfig) -> usize {
        let Self { ejected, viruses, spawner, border, .. } = self;
        if ejected.is_empty() || viruses.is_empty() {
            return 0;
        }

        let mut absorbed = FixedBitSet::with_capacity(ejected.len());
        let mut spawned = 0;
        for (i, pellet) in ejected.iter().enumerate() {
            let Some(index) = viruses.iter().position(|v| v.covers(pellet)) else {
                continue;
            };
            absorbed.insert(i);

            if !viruses[index].feed(pellet.mass, config.shoot_threshold) || viruses.len() >= config.max_amount {
                continue;
            }

            let position = border.clamp(viruses[index].position + spawner.random_direction() * config.shoot_distance);
            viruses.push(Virus::new(position, config.base_mass, config.color));
            spawned += 1;
            debug!("Virus reproduced at ({:.0}, {:.0})", position.x, position.y);
        }

        compact(ejected, &absorbed);
        spawned
    }
}
