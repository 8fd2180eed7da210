//! Game entities.
//!
//! This module defines every body that lives in the world: player cells and
//! the players that own them, food, viruses and ejected mass.

mod cell;
mod ejected_mass;
mod food;
mod player;
mod player_cell;
mod virus;

pub use cell::Cell;
pub use ejected_mass::EjectedMass;
pub use food::Food;
pub use player::Player;
pub use player_cell::PlayerCell;
pub use virus::Virus;
