//! Server -> Client messages and snapshot payloads.

use crate::Color;
use serde::{Deserialize, Serialize};

/// Outbound message envelope: `{"type": "welcome" | "update", "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Sent once per join/respawn to the joining connection.
    Welcome(Welcome),
    /// Sent to every connection at the broadcast cadence.
    Update(Snapshot),
}

impl ServerMessage {
    /// Serialize to the JSON text frame sent over the wire.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Welcome payload identifying the newly created player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Welcome {
    pub id: u32,
    pub color: Color,
    pub world_size: f32,
}

/// Quantized view of the whole world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub players: Vec<PlayerView>,
    pub food: Vec<FoodView>,
    pub viruses: Vec<VirusView>,
    pub ejected: Vec<EjectedView>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub world_size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: u32,
    pub name: String,
    pub color: Color,
    pub cells: Vec<CellView>,
    pub alive: bool,
    pub is_spectating: bool,
}

/// Player cell with position and mass rounded to one decimal place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub mass: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodView {
    pub x: f32,
    pub y: f32,
    pub mass: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VirusView {
    pub x: f32,
    pub y: f32,
    pub mass: f32,
    pub color: Color,
    pub feed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EjectedView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub mass: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Color,
}

/// A leaderboard row; `score` is floor-truncated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    pub id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn welcome_envelope() {
        let msg = ServerMessage::Welcome(Welcome {
            id: 7,
            color: Color::new(0x11, 0x22, 0x33),
            world_size: 7000.0,
        });
        let value: Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"type": "welcome", "data": {"id": 7, "color": "#112233", "worldSize": 7000.0}})
        );
    }

    #[test]
    fn update_uses_client_field_names() {
        let snapshot = Snapshot {
            players: vec![PlayerView {
                id: 1,
                name: "a".to_string(),
                color: Color::new(1, 2, 3),
                cells: vec![CellView { id: 4, x: 1.5, y: -2.5, mass: 40.0 }],
                alive: true,
                is_spectating: false,
            }],
            leaderboard: vec![LeaderboardEntry { name: "a".to_string(), score: 40, id: 1 }],
            world_size: 7000.0,
            ..Default::default()
        };
        let value: Value = serde_json::from_str(&ServerMessage::Update(snapshot).to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "update");
        assert_eq!(value["data"]["worldSize"], 7000.0);
        assert_eq!(value["data"]["players"][0]["isSpectating"], false);
        assert_eq!(value["data"]["players"][0]["cells"][0]["mass"], 40.0);
        assert_eq!(value["data"]["leaderboard"][0]["score"], 40);
        assert!(value["data"]["food"].as_array().unwrap().is_empty());
    }
}
