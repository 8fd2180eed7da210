//! Message definitions for the cell arena protocol.
//!
//! Every message is a JSON object of the form `{"type": ..., "data": ...}`.
//! Inbound commands are parsed into the closed [`ClientCommand`] type; outbound
//! messages are built as [`ServerMessage`] values and serialized once.

mod client;
mod server;

pub use client::*;
pub use server::*;
