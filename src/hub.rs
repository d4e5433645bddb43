use std::collections::HashMap;
use std::sync::Arc;
use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;
use warp::ws::{Message, WebSocket};

use crate::messages::{EventName, MESSAGE_EVENT};

type Connections = Arc<RwLock<HashMap<String, mpsc::UnboundedSender<Message>>>>;

/// Fan-out relay over the set of live WebSocket sessions.
#[derive(Clone, Default)]
pub struct Hub {
    connections: Connections,
}

impl Hub {
    pub fn new() -> Self {
        Hub {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Drives one upgraded socket until the peer goes away.
    pub async fn handle_connection(&self, ws: WebSocket) {
        let (session_id, mut rx) = self.connect().await;
        let (mut ws_tx, mut ws_rx) = ws.split();

        let writer_id = session_id.clone();
        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if let Err(e) = ws_tx.send(message).await {
                    warn!("Failed to send to session {}: {}", writer_id, e);
                    break;
                }
            }
        });

        while let Some(result) = ws_rx.next().await {
            match result {
                Ok(msg) if msg.is_close() => break,
                Ok(msg) => {
                    self.on_message(&session_id, msg).await;
                }
                Err(e) => {
                    warn!("WebSocket error on session {}: {}", session_id, e);
                    break;
                }
            }
        }

        self.disconnect(&session_id).await;
    }

    /// Adds a session to the live set. Frames queued for it arrive on the returned receiver.
    pub async fn connect(&self) -> (String, mpsc::UnboundedReceiver<Message>) {
        let session_id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::unbounded_channel();

        let total = {
            let mut connections = self.connections.write().await;
            connections.insert(session_id.clone(), tx);
            connections.len()
        };
        info!("Client connected: {} (total={})", session_id, total);

        (session_id, rx)
    }

    /// Routes one inbound frame. `message` events go to every session, sender included,
    /// exactly as received. Returns how many sessions the frame was queued to.
    pub async fn on_message(&self, session_id: &str, frame: Message) -> usize {
        let Ok(text) = frame.to_str() else {
            debug!("Ignoring non-text frame from {}", session_id);
            return 0;
        };

        let event = match serde_json::from_str::<EventName>(text) {
            Ok(name) => name.event,
            Err(e) => {
                warn!("Dropping unroutable frame from {}: {}", session_id, e);
                return 0;
            }
        };

        if event != MESSAGE_EVENT {
            debug!("Ignoring event {:?} from {}", event, session_id);
            return 0;
        }

        info!("Received message from {}: {}", session_id, text);
        self.broadcast(frame).await
    }

    /// Removes a session. Nobody else is told.
    pub async fn disconnect(&self, session_id: &str) {
        let removed = {
            let mut connections = self.connections.write().await;
            connections.remove(session_id).is_some()
        };
        if removed {
            info!("Client disconnected: {}", session_id);
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    async fn broadcast(&self, frame: Message) -> usize {
        let connections = self.connections.read().await;
        let mut delivered = 0;
        for sender in connections.values() {
            if sender.send(frame.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }
}
