//! Game state and main loop.

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::world::World;
use protocol::{ClientCommand, ProtocolError, ServerMessage, Snapshot, Welcome};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::client::Client;

/// Ticks between periodic metrics lines.
const METRICS_INTERVAL: u64 = 600;

/// Main game state.
pub struct GameState {
    pub config: Config,
    pub world: World,
    pub tick_count: u64,

    // ID counters
    next_client_id: u32,

    // Connected clients
    pub clients: HashMap<u32, Client>,

    clock: Arc<dyn Clock>,
    /// Clock time of the last snapshot.
    last_broadcast: Option<u64>,

    /// Average tick duration in milliseconds (smoothed).
    pub update_time_avg: f64,
}

impl GameState {
    /// Create a new game state driven by the system clock.
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a new game state with an explicit time source.
    ///
    /// The world is populated immediately so the first snapshot is complete.
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let mut world = World::new(config);
        world.maintain_population(config);
        let counts = world.counts();
        info!("World initialized: {} food, {} viruses", counts.food, counts.viruses);

        Self {
            config: config.clone(),
            world,
            tick_count: 0,
            next_client_id: 1,
            clients: HashMap::new(),
            clock,
            last_broadcast: None,
            update_time_avg: 0.0,
        }
    }

    /// Add a new client.
    pub fn add_client(&mut self, addr: SocketAddr) -> u32 {
        let id = self.next_client_id;
        self.next_client_id += 1;
        self.clients.insert(id, Client::new(addr));
        info!("Client {} connected from {}", id, addr);
        id
    }

    /// Remove a client together with its player.
    pub fn remove_client(&mut self, id: u32) {
        if let Some(client) = self.clients.remove(&id) {
            info!("Client {} ({}) disconnected", id, client.addr);
            if let Some(player_id) = client.player_id {
                self.world.remove_player(player_id);
            }
        }
    }

    /// Handle a raw text frame from a client.
    ///
    /// Returns the reply for that client, if any.
    pub fn handle_message(&mut self, client_id: u32, raw: &str) -> Result<Option<ServerMessage>, ProtocolError> {
        let command = ClientCommand::parse(raw)?;
        Ok(self.handle_command(client_id, command))
    }

    /// Apply a parsed command from a client.
    pub fn handle_command(&mut self, client_id: u32, command: ClientCommand) -> Option<ServerMessage> {
        let now = self.clock.now_ms();
        let Self { config, world, clients, .. } = self;
        let client = clients.get_mut(&client_id)?;

        if let ClientCommand::Join { name } = &command {
            if client.joined {
                debug!("Client {} sent a duplicate join", client_id);
                return None;
            }
            client.joined = true;
            let player_id = world.join(name.as_deref(), config, now);
            client.player_id = Some(player_id);
            info!("Client {} joined as player {}", client_id, player_id);
            return welcome(world, player_id);
        }

        let Some(player_id) = client.player_id else {
            debug!("Client {} sent {} before joining", client_id, command.kind());
            return None;
        };

        match command {
            ClientCommand::Move { x, y } => world.set_target(player_id, x, y),
            ClientCommand::Split => {
                let added = world.split(player_id, config, now);
                debug!("Player {} split {} cells", player_id, added);
            }
            ClientCommand::Eject => {
                let ejected = world.eject(player_id, config);
                debug!("Player {} ejected {} pellets", player_id, ejected);
            }
            ClientCommand::Respawn { name } => {
                let new_id = world.respawn(player_id, name.as_deref(), config, now)?;
                client.player_id = Some(new_id);
                info!("Client {} respawned as player {}", client_id, new_id);
                return welcome(world, new_id);
            }
            ClientCommand::Join { .. } => {}
        }
        None
    }

    /// Run one simulation step.
    ///
    /// Returns a snapshot when the broadcast interval has elapsed.
    pub fn tick(&mut self) -> Option<Snapshot> {
        self.tick_count += 1;
        let now = self.clock.now_ms();
        self.world.step(&self.config, now);

        let due = self
            .last_broadcast
            .is_none_or(|last| now.saturating_sub(last) >= self.config.broadcast_interval_ms());
        if !due {
            return None;
        }
        self.last_broadcast = Some(now);
        Some(self.world.snapshot(self.config.server.leaderboard_size))
    }
}

fn welcome(world: &World, player_id: u32) -> Option<ServerMessage> {
    let player = world.player(player_id)?;
    Some(ServerMessage::Welcome(Welcome {
        id: player.id,
        color: player.color,
        world_size: world.border.size,
    }))
}

/// Run the game loop, fanning serialized snapshots out on `updates`.
pub async fn run_game_loop(state: Arc<RwLock<GameState>>, updates: broadcast::Sender<Arc<str>>) {
    let tick_interval = state.read().await.config.tick_interval();
    let start = Instant::now() + tick_interval;
    let mut ticker = interval_at(start, tick_interval);
    // Never run ticks back to back to catch up.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let tick_budget = tick_interval.as_secs_f64() * 1000.0 * 0.9;

    loop {
        ticker.tick().await;

        let snapshot = {
            let mut game = state.write().await;
            let tick_start = std::time::Instant::now();
            let snapshot = game.tick();
            let tick_ms = tick_start.elapsed().as_secs_f64() * 1000.0;

            // Exponential moving average
            game.update_time_avg = game.update_time_avg * 0.5 + tick_ms * 0.5;

            if tick_ms > tick_budget {
                let counts = game.world.counts();
                warn!(
                    "Slow tick #{}: {:.3}ms (budget: {:.1}ms) - {} players, {} cells total",
                    game.tick_count, tick_ms, tick_budget, counts.players, counts.cells
                );
            }

            if game.tick_count % METRICS_INTERVAL == 0 {
                let counts = game.world.counts();
                debug!(
                    "Tick #{}: avg {:.3}ms, {} clients, {} players, {} cells, {} food, {} viruses, {} ejected",
                    game.tick_count,
                    game.update_time_avg,
                    game.clients.len(),
                    counts.players,
                    counts.cells,
                    counts.food,
                    counts.viruses,
                    counts.ejected
                );
            }

            snapshot
        }; // Write lock released here

        let Some(snapshot) = snapshot else {
            continue;
        };
        match ServerMessage::Update(snapshot).to_json() {
            Ok(json) => {
                // No receivers just means nobody is connected.
                let _ = updates.send(Arc::from(json));
            }
            Err(e) => error!("Failed to serialize snapshot: {}", e),
        }
    }
}
