//! Client -> Server command parsing.

use crate::ProtocolError;
use serde_json::{Map, Value};

/// A validated inbound command.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    /// Enter the arena with an optional display name.
    Join { name: Option<String> },
    /// Set the steering target in world coordinates.
    Move { x: f32, y: f32 },
    /// Split every eligible cell toward the steering target.
    Split,
    /// Eject a mass pellet from every eligible cell.
    Eject,
    /// Replace the current player with a fresh one.
    Respawn { name: Option<String> },
}

impl ClientCommand {
    /// Parse a command from a raw text frame.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(raw)?;
        let object = value.as_object().ok_or(ProtocolError::NotAnObject)?;
        let message_type = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingType)?;
        let data = object.get("data").and_then(Value::as_object);

        match message_type {
            "join" => Ok(ClientCommand::Join { name: parse_name(data) }),
            "move" => {
                let data = data.ok_or(ProtocolError::InvalidPayload("move requires data"))?;
                let x = parse_coordinate(data, "x")?;
                let y = parse_coordinate(data, "y")?;
                Ok(ClientCommand::Move { x, y })
            }
            "split" => Ok(ClientCommand::Split),
            "eject" => Ok(ClientCommand::Eject),
            "respawn" => Ok(ClientCommand::Respawn { name: parse_name(data) }),
            other => Err(ProtocolError::UnknownType(other.to_string())),
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientCommand::Join { .. } => "join",
            ClientCommand::Move { .. } => "move",
            ClientCommand::Split => "split",
            ClientCommand::Eject => "eject",
            ClientCommand::Respawn { .. } => "respawn",
        }
    }
}

/// Names are optional; anything that is not a non-empty string counts as absent.
fn parse_name(data: Option<&Map<String, Value>>) -> Option<String> {
    data?
        .get("name")?
        .as_str()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn parse_coordinate(data: &Map<String, Value>, key: &'static str) -> Result<f32, ProtocolError> {
    let value = data
        .get(key)
        .and_then(Value::as_f64)
        .ok_or(ProtocolError::InvalidPayload("coordinate must be a number"))?;
    let value = value as f32;
    if !value.is_finite() {
        return Err(ProtocolError::InvalidPayload("coordinate must be finite"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_join_with_name() {
        let parsed = ClientCommand::parse(r#"{"type":"join","data":{"name":"blob"}}"#)
            .expect("join should parse");
        assert_eq!(parsed, ClientCommand::Join { name: Some("blob".to_string()) });
    }

    #[test]
    fn parse_join_without_data() {
        let parsed = ClientCommand::parse(r#"{"type":"join"}"#).expect("join should parse");
        assert_eq!(parsed, ClientCommand::Join { name: None });

        let parsed = ClientCommand::parse(r#"{"type":"join","data":{"name":42}}"#)
            .expect("non-string name is ignored");
        assert_eq!(parsed, ClientCommand::Join { name: None });

        let parsed = ClientCommand::parse(r#"{"type":"join","data":{"name":"   "}}"#)
            .expect("blank name is ignored");
        assert_eq!(parsed, ClientCommand::Join { name: None });
    }

    #[test]
    fn parse_move() {
        let parsed = ClientCommand::parse(r#"{"type":"move","data":{"x":12.5,"y":-300}}"#)
            .expect("move should parse");
        assert_eq!(parsed, ClientCommand::Move { x: 12.5, y: -300.0 });
    }

    #[test]
    fn parse_move_rejects_bad_payload() {
        assert!(matches!(
            ClientCommand::parse(r#"{"type":"move"}"#),
            Err(ProtocolError::InvalidPayload(_))
        ));
        assert!(matches!(
            ClientCommand::parse(r#"{"type":"move","data":{"x":"1","y":2}}"#),
            Err(ProtocolError::InvalidPayload(_))
        ));
        assert!(matches!(
            ClientCommand::parse(r#"{"type":"move","data":{"x":1e300,"y":2}}"#),
            Err(ProtocolError::InvalidPayload(_))
        ));
    }

    #[test]
    fn parse_unit_commands() {
        assert_eq!(ClientCommand::parse(r#"{"type":"split"}"#).unwrap(), ClientCommand::Split);
        assert_eq!(
            ClientCommand::parse(r#"{"type":"eject","data":null}"#).unwrap(),
            ClientCommand::Eject
        );
        assert_eq!(
            ClientCommand::parse(r#"{"type":"respawn","data":{}}"#).unwrap(),
            ClientCommand::Respawn { name: None }
        );
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(matches!(ClientCommand::parse("not json"), Err(ProtocolError::InvalidJson(_))));
        assert!(matches!(ClientCommand::parse("[1,2]"), Err(ProtocolError::NotAnObject)));
        assert!(matches!(ClientCommand::parse(r#"{"data":{}}"#), Err(ProtocolError::MissingType)));
        assert!(matches!(
            ClientCommand::parse(r#"{"type":"chat"}"#),
            Err(ProtocolError::UnknownType(t)) if t == "chat"
        ));
    }
}
