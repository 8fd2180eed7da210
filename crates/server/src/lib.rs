//! Cell arena game server library.
//!
//! The simulation core ([`World`] and its stages) is synchronous and owns all
//! state; [`server`] wraps it in a single lock and drives it over WebSockets.

pub mod actions;
pub mod clock;
pub mod config;
pub mod entity;
pub mod feeding;
pub mod geometry;
pub mod interaction;
pub mod movement;
pub mod population;
pub mod server;
pub mod simulation;
pub mod snapshot;
pub mod world;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use server::{run, GameState};
pub use world::World;
