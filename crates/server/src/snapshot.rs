//! Snapshot and leaderboard building.

use crate::geometry::quantize;
use crate::world::World;
use protocol::{CellView, EjectedView, FoodView, LeaderboardEntry, PlayerView, Snapshot, VirusView};

impl World {
    /// Build the broadcast snapshot.
    ///
    /// Player cell positions and masses are rounded to one decimal place;
    /// food, viruses and pellets are sent as they are.
    pub fn snapshot(&self, leaderboard_size: usize) -> Snapshot {
        let players = self
            .players
            .iter()
            .map(|p| PlayerView {
                id: p.id,
                name: p.name.clone(),
                color: p.color,
                cells: p
                    .cells
                    .iter()
                    .map(|c| CellView {
                        id: c.id,
                        x: quantize(c.position.x),
                        y: quantize(c.position.y),
                        mass: quantize(c.mass),
                    })
                    .collect(),
                alive: p.alive,
                is_spectating: p.is_spectating,
            })
            .collect();

        let food = self
            .food
            .iter()
            .map(|f| FoodView {
                x: f.position.x,
                y: f.position.y,
                mass: f.mass,
                color: f.color,
            })
            .collect();

        let viruses = self
            .viruses
            .iter()
            .map(|v| VirusView {
                x: v.position.x,
                y: v.position.y,
                mass: v.mass,
                color: v.color,
                feed: v.feed,
            })
            .collect();

        let ejected = self
            .ejected
            .iter()
            .map(|e| EjectedView {
                id: e.id,
                x: e.position.x,
                y: e.position.y,
                mass: e.mass,
                vx: e.velocity.x,
                vy: e.velocity.y,
                color: e.color,
            })
            .collect();

        Snapshot {
            players,
            food,
            viruses,
            ejected,
            leaderboard: self.leaderboard(leaderboard_size),
            world_size: self.border.size,
        }
    }

    /// Top `limit` players by score, ties kept in join order.
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut ranked: Vec<_> = self.players.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
            .into_iter()
            .take(limit)
            .map(|p| LeaderboardEntry {
                name: p.name.clone(),
                score: p.score.max(0.0).floor() as u64,
                id: p.id,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::entity::{EjectedMass, Food, Virus};
    use crate::world::World;
    use glam::Vec2;
    use protocol::Color;

    fn world_with_players(scores: &[(&str, f32)]) -> (Config, World) {
        let mut config = Config::default();
        config.server.seed = Some(2);
        let mut world = World::new(&config);
        for &(name, score) in scores {
            let id = world.join(Some(name), &config, 0);
            world.player_mut(id).unwrap().score = score;
        }
        (config, world)
    }

    #[test]
    fn test_leaderboard_order() {
        let (_, world) = world_with_players(&[("a", 50.9), ("b", 120.0), ("c", 50.2), ("d", 300.5)]);
        let board = world.leaderboard(10);
        let names: Vec<_> = board.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["d", "b", "a", "c"]);
        assert_eq!(board[0].score, 300);
        assert_eq!(board[2].score, 50);
        assert_eq!(board[0].id, world.players[3].id);
    }

    #[test]
    fn test_leaderboard_ties_keep_join_order() {
        let (_, world) = world_with_players(&[("first", 40.0), ("second", 40.0), ("third", 40.0)]);
        let board = world.leaderboard(2);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].name, "first");
        assert_eq!(board[1].name, "second");
    }

    #[test]
    fn test_snapshot_rounds_cells() {
        let (config, mut world) = world_with_players(&[("a", 40.0)]);
        {
            let cell = &mut world.players[0].cells[0];
            cell.position = Vec2::new(12.345, -7.06);
            cell.mass = 41.27;
        }
        world.food.push(Food::new(Vec2::new(1.234, 5.678), 2.0, Color::default()));
        world.viruses.push(Virus::new(Vec2::new(3.33, 4.44), 100.0, config.virus.color));
        world.ejected.push(EjectedMass::new(9, Vec2::new(0.55, 0.0), 12.0, Vec2::new(30.0, 0.0), Color::default()));
        world.players[0].alive = false;
        world.players[0].is_spectating = true;

        let snapshot = world.snapshot(config.server.leaderboard_size);
        let cell = snapshot.players[0].cells[0];
        assert_eq!((cell.x, cell.y, cell.mass), (12.3, -7.1, 41.3));
        assert!(!snapshot.players[0].alive);
        assert!(snapshot.players[0].is_spectating);
        assert_eq!(snapshot.food[0].x, 1.234);
        assert_eq!(snapshot.viruses[0].mass, 100.0);
        assert_eq!(snapshot.ejected[0].vx, 30.0);
        assert_eq!(snapshot.leaderboard.len(), 1);
        assert_eq!(snapshot.world_size, 7000.0);
    }
}
