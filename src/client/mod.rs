//! Client-side chat state: the feed, the input box, @mention suggestions and
//! the emoji picker. All of it is owned by [`ChatClient`] and only changes
//! through its handlers.

pub mod emoji;
pub mod mention;

use std::collections::VecDeque;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use thiserror::Error;
use uuid::Uuid;

use crate::messages::{ChatMessage, EventFrame, MESSAGE_EVENT};
use crate::roster::Roster;
use crate::transport::Transport;

use self::emoji::{EmojiPicker, PointerTarget};
use self::mention::Token;

/// Sent ids remembered for echo detection; the oldest is forgotten first.
const MAX_AWAITING_ECHO: usize = 256;

/// How the sender name is chosen for a submitted message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SenderSampling {
    /// One sampled sender; the feed and the hub see the same message.
    #[default]
    Shared,
    /// The feed copy and the transmitted copy each get their own sampled sender.
    PerPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed frame: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unexpected event {0:?}")]
    UnexpectedEvent(String),
}

pub struct ChatClient<T: Transport> {
    roster: Roster,
    transport: T,
    rng: Box<dyn RngCore + Send>,
    sampling: SenderSampling,
    messages: Vec<ChatMessage>,
    input_text: String,
    suggestions: Vec<String>,
    pending_mentions: Vec<String>,
    emoji_picker: EmojiPicker,
    awaiting_echo: VecDeque<Uuid>,
}

impl<T: Transport> ChatClient<T> {
    pub fn new(roster: Roster, transport: T) -> Self {
        Self::with_rng(roster, transport, StdRng::from_entropy())
    }

    pub fn with_rng<R>(roster: Roster, transport: T, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        ChatClient {
            roster,
            transport,
            rng: Box::new(rng),
            sampling: SenderSampling::default(),
            messages: Vec::new(),
            input_text: String::new(),
            suggestions: Vec::new(),
            pending_mentions: Vec::new(),
            emoji_picker: EmojiPicker::default(),
            awaiting_echo: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn sender_sampling(mut self, sampling: SenderSampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn pending_mentions(&self) -> &[String] {
        &self.pending_mentions
    }

    pub fn emoji_picker(&self) -> EmojiPicker {
        self.emoji_picker
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn on_key(&mut self, key: Key) -> bool {
        match key {
            Key::Enter => self.submit().await,
            Key::Other => false,
        }
    }

    /// Appends the current input to the feed and sends it to the hub.
    ///
    /// Blank input does nothing and returns `false`. A failed send is logged;
    /// the message stays in the local feed either way.
    pub async fn submit(&mut self) -> bool {
        if self.input_text.trim().is_empty() {
            return false;
        }

        let text = std::mem::take(&mut self.input_text);
        let mentions = std::mem::take(&mut self.pending_mentions);

        let local = ChatMessage::new(self.roster.sample(&mut *self.rng), text, mentions);
        let outgoing = match self.sampling {
            SenderSampling::Shared => local.clone(),
            SenderSampling::PerPath => ChatMessage::new(
                self.roster.sample(&mut *self.rng),
                local.text.clone(),
                local.mentions.clone(),
            ),
        };
        self.messages.push(local);

        if self.awaiting_echo.len() == MAX_AWAITING_ECHO {
            self.awaiting_echo.pop_front();
        }
        self.awaiting_echo.push_back(outgoing.id);
        if let Err(e) = self.transport.emit(&outgoing).await {
            warn!("Failed to send message to hub: {}", e);
            self.forget_echo(outgoing.id);
        }
        true
    }

    /// Merges a frame received from the hub into the feed.
    ///
    /// Returns `Ok(false)` for the echo of a message this client sent itself.
    /// Likes are per viewer, so whatever count arrives is reset.
    pub fn on_broadcast(&mut self, frame: &str) -> Result<bool, DecodeError> {
        let frame: EventFrame<ChatMessage> = serde_json::from_str(frame)?;
        if frame.event != MESSAGE_EVENT {
            return Err(DecodeError::UnexpectedEvent(frame.event));
        }

        let mut message = frame.data;
        if self.forget_echo(message.id) {
            debug!("Skipping echo of own message {}", message.id);
            return Ok(false);
        }

        message.likes = 0;
        self.messages.push(message);
        Ok(true)
    }

    /// The hub connection is gone; no pending echo will ever arrive.
    pub fn on_disconnect(&mut self) {
        self.awaiting_echo.clear();
    }

    fn forget_echo(&mut self, id: Uuid) -> bool {
        match self.awaiting_echo.iter().position(|pending| *pending == id) {
            Some(pos) => {
                self.awaiting_echo.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn like(&mut self, index: usize) -> bool {
        match self.messages.get_mut(index) {
            Some(message) => {
                message.likes += 1;
                true
            }
            None => false,
        }
    }

    pub fn on_input_change(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
        self.suggestions = mention::suggestions_for(&self.roster, &self.input_text);
    }

    pub fn on_suggestion_click(&mut self, username: &str) {
        self.input_text = mention::complete_mention(&self.input_text, username);
        self.suggestions.clear();
    }

    /// Records `@username` for the next submitted message. Unknown names are refused.
    pub fn add_pending_mention(&mut self, username: &str) -> bool {
        if !self.roster.contains(username) {
            return false;
        }
        let token = format!("@{username}");
        if !self.pending_mentions.contains(&token) {
            self.pending_mentions.push(token);
        }
        true
    }

    /// Clicking a rendered mention appends it to the input again.
    pub fn on_mention_click(&mut self, token: &str) {
        let username = token.strip_prefix('@').unwrap_or(token);
        self.input_text.push('@');
        self.input_text.push_str(username);
        self.input_text.push(' ');
        self.pending_mentions.clear();
    }

    pub fn render(&self, index: usize) -> Option<Vec<Token>> {
        self.messages.get(index).map(mention::render)
    }

    pub fn on_emoji_click(&mut self, glyph: &str) {
        self.input_text.push_str(glyph);
    }

    pub fn toggle_emoji_picker(&mut self) {
        self.emoji_picker.toggle();
    }

    pub fn on_pointer_down(&mut self, target: PointerTarget) {
        self.emoji_picker.on_pointer_down(target);
    }
}
