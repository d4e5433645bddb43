use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event name carried by chat frames in both directions.
pub const MESSAGE_EVENT: &str = "message";

/// A single chat entry as displayed in a feed and sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub user: String,
    pub text: String,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub mentions: Vec<String>,
}

impl ChatMessage {
    pub fn new(user: impl Into<String>, text: impl Into<String>, mentions: Vec<String>) -> Self {
        ChatMessage {
            id: Uuid::new_v4(),
            user: user.into(),
            text: text.into(),
            likes: 0,
            mentions,
        }
    }
}

/// Envelope for every frame exchanged with the hub: `{"event": ..., "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventFrame<T> {
    pub event: String,
    pub data: T,
}

impl<'a> EventFrame<&'a ChatMessage> {
    pub fn message(data: &'a ChatMessage) -> Self {
        EventFrame {
            event: MESSAGE_EVENT.to_string(),
            data,
        }
    }
}

/// Only the routing part of a frame. The hub reads this and nothing else.
#[derive(Debug, Deserialize)]
pub struct EventName {
    pub event: String,
}
