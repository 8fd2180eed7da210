//! Client session state.

use std::net::SocketAddr;

/// A connected client session.
#[derive(Debug)]
pub struct Client {
    /// Remote address.
    pub addr: SocketAddr,
    /// Player controlled by this connection, once joined.
    pub player_id: Option<u32>,
    /// Whether a join has been honored; later joins are ignored.
    pub joined: bool,
}

impl Client {
    /// Create a new client session.
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            player_id: None,
            joined: false,
        }
    }
}
