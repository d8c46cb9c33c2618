//! Engine.IO v4 / Socket.IO v5 text framing, default namespace only.
//!
//! A text frame starts with an Engine.IO packet type. Type `4` (message)
//! carries a Socket.IO packet whose first character is its own type, e.g.
//! `42["message",{...}]` is an event on the default namespace.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::error::WireError;

/// Event name used in both directions.
pub const MESSAGE_EVENT: &str = "message";

/// Namespace connect request (client) / ack (server, with payload).
pub const CONNECT_FRAME: &str = "40";
/// Namespace disconnect.
pub const DISCONNECT_FRAME: &str = "41";
/// Engine.IO heartbeat reply.
pub const PONG_FRAME: &str = "3";

#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Engine.IO handshake with session parameters.
    Open(Value),
    /// Engine.IO close.
    Close,
    Ping,
    Pong,
    /// Socket.IO namespace connected.
    Connect(Option<Value>),
    /// Socket.IO namespace disconnected by the server.
    Disconnect,
    Event { name: String, args: Vec<Value> },
    /// Socket.IO namespace connection refused.
    ConnectError(Value),
    /// Valid but irrelevant for a text-only client (acks, binary, upgrade, noop).
    Ignored,
}

pub fn decode(frame: &str) -> Result<Packet, WireError> {
    let mut chars = frame.chars();
    let engine_type = chars.next().ok_or(WireError::Empty)?;
    let rest = chars.as_str();

    match engine_type {
        '0' => parse_json(rest).map(Packet::Open),
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '4' => decode_socket(rest),
        '5' | '6' => Ok(Packet::Ignored),
        other => Err(WireError::UnknownEngineType(other)),
    }
}

fn decode_socket(packet: &str) -> Result<Packet, WireError> {
    let mut chars = packet.chars();
    let socket_type = chars
        .next()
        .ok_or_else(|| WireError::Payload("missing socket packet type".to_string()))?;
    let body = strip_namespace(chars.as_str());

    match socket_type {
        '0' => {
            if body.is_empty() {
                Ok(Packet::Connect(None))
            } else {
                parse_json(body).map(|value| Packet::Connect(Some(value)))
            }
        }
        '1' => Ok(Packet::Disconnect),
        '2' => decode_event(strip_ack_id(body)),
        '4' => parse_json(body).map(Packet::ConnectError),
        '3' | '5' | '6' => Ok(Packet::Ignored),
        other => Err(WireError::UnknownSocketType(other)),
    }
}

fn decode_event(body: &str) -> Result<Packet, WireError> {
    let value = parse_json(body)?;
    let Value::Array(mut items) = value else {
        return Err(WireError::Payload("event body is not an array".to_string()));
    };
    if items.is_empty() {
        return Err(WireError::Payload("event without a name".to_string()));
    }
    let name = match items.remove(0) {
        Value::String(name) => name,
        other => {
            return Err(WireError::Payload(format!(
                "event name is not a string: {other}"
            )));
        }
    };

    Ok(Packet::Event { name, args: items })
}

/// Drops a `/nsp,` prefix. Only the default namespace is used, so the name
/// itself is not checked.
fn strip_namespace(body: &str) -> &str {
    if body.starts_with('/') {
        match body.find(',') {
            Some(index) => &body[index + 1..],
            None => "",
        }
    } else {
        body
    }
}

fn strip_ack_id(body: &str) -> &str {
    body.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn parse_json(body: &str) -> Result<Value, WireError> {
    serde_json::from_str(body).map_err(|err| WireError::Payload(err.to_string()))
}

/// Encodes `42["<name>",<payload>]`.
/// How long the server may stay silent before the connection counts as
/// dead: `pingInterval + pingTimeout` from the open handshake.
pub fn heartbeat_window(handshake: &Value) -> Option<Duration> {
    let interval = handshake.get("pingInterval")?.as_u64()?;
    let timeout = handshake.get("pingTimeout")?.as_u64()?;
    Some(Duration::from_millis(interval.saturating_add(timeout)))
}

pub fn encode_event<T: Serialize>(name: &str, payload: &T) -> Result<String, serde_json::Error> {
    let body = serde_json::to_string(&(name, payload))?;
    Ok(format!("42{body}"))
}
