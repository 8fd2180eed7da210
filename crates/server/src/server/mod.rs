//! WebSocket transport around the shared game state.

use crate::config::Config;
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, RwLock};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

pub mod client;
pub mod game;

pub use game::{run_game_loop, GameState};

/// Snapshots buffered per connection before it starts lagging.
const UPDATE_CHANNEL_CAPACITY: usize = 8;

/// Connection tracking state (shared across connection handlers).
struct ConnectionState {
    /// Number of connections per IP address.
    ip_connections: HashMap<IpAddr, usize>,
    /// Total number of connections.
    total_connections: usize,
}

impl ConnectionState {
    fn new() -> Self {
        Self {
            ip_connections: HashMap::new(),
            total_connections: 0,
        }
    }

    /// Try to add a connection, returns true if allowed.
    fn try_add_connection(&mut self, ip: IpAddr, max_total: usize, max_per_ip: usize) -> bool {
        if self.total_connections >= max_total {
            return false;
        }

        let current = self.ip_connections.get(&ip).copied().unwrap_or(0);
        if current >= max_per_ip {
            return false;
        }

        *self.ip_connections.entry(ip).or_insert(0) += 1;
        self.total_connections += 1;
        true
    }

    /// Remove a connection.
    fn remove_connection(&mut self, ip: IpAddr) {
        if let Some(count) = self.ip_connections.get_mut(&ip) {
            if *count > 0 {
                *count -= 1;
                self.total_connections = self.total_connections.saturating_sub(1);
            }
            if *count == 0 {
                self.ip_connections.remove(&ip);
            }
        }
    }
}

/// Run the game server.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on ws://{}", addr);

    let conn_state = Arc::new(RwLock::new(ConnectionState::new()));

    // Serialized snapshots, shared by every connection
    let (updates_tx, _updates_rx) = broadcast::channel::<Arc<str>>(UPDATE_CHANNEL_CAPACITY);

    let game_state = Arc::new(RwLock::new(GameState::new(&config)));

    let game_loop_state = Arc::clone(&game_state);
    let game_loop_tx = updates_tx.clone();
    tokio::spawn(async move {
        game::run_game_loop(game_loop_state, game_loop_tx).await;
    });

    let max_connections = config.server.max_connections;
    let ip_limit = config.server.ip_limit;

    loop {
        let (stream, addr) = listener.accept().await?;
        let ip = addr.ip();

        {
            let mut state = conn_state.write().await;
            if !state.try_add_connection(ip, max_connections, ip_limit) {
                warn!("Connection rejected (limit reached): {}", addr);
                continue;
            }
        }

        let game_state = Arc::clone(&game_state);
        let conn_state = Arc::clone(&conn_state);
        let updates_rx = updates_tx.subscribe();

        tokio::spawn(async move {
            let result = handle_connection(stream, addr, game_state, updates_rx).await;

            // Always remove from connection tracking when done
            {
                let mut state = conn_state.write().await;
                state.remove_connection(addr.ip());
            }

            if let Err(e) = result {
                error!("Connection error from {}: {}", addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    game_state: Arc<RwLock<GameState>>,
    mut updates_rx: broadcast::Receiver<Arc<str>>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New connection from {}", addr);

    let (mut write, mut read) = ws_stream.split();

    let client_id = {
        let mut state = game_state.write().await;
        state.add_client(addr)
    };

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = {
                            let mut state = game_state.write().await;
                            state.handle_message(client_id, text.as_str())
                        };
                        match reply {
                            Ok(Some(reply)) => match reply.to_json() {
                                Ok(json) => {
                                    if let Err(e) = write.send(Message::Text(json.into())).await {
                                        warn!("Failed to send reply to {}: {}", addr, e);
                                        break;
                                    }
                                }
                                Err(e) => error!("Failed to serialize reply for {}: {}", addr, e),
                            },
                            Ok(None) => {}
                            Err(e) => warn!("Bad message from {}: {}", addr, e),
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Client {} disconnected", addr);
                        break;
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error from {}: {}", addr, e);
                        break;
                    }
                    None => {
                        break;
                    }
                    _ => {}
                }
            }
            update = updates_rx.recv() => {
                match update {
                    Ok(json) => {
                        if let Err(e) = write.send(Message::Text(json.to_string().into())).await {
                            warn!("Failed to send update to {}: {}", addr, e);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!("Client {} lagged, skipped {} updates", addr, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    {
        let mut state = game_state.write().await;
        state.remove_client(client_id);
    }

    Ok(())
}
