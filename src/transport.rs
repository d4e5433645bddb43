use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::messages::{ChatMessage, EventFrame};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Connection to hub is closed")]
    Closed,
}

/// Outbound half of the client's hub connection.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn emit(&self, message: &ChatMessage) -> Result<(), TransportError>;
}

/// WebSocket connection to the hub.
pub struct WsTransport {
    sink: Mutex<SplitSink<WsStream, Message>>,
}

impl WsTransport {
    /// Dials the hub and returns the transport plus a receiver of raw inbound text frames.
    pub async fn connect(
        url: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<String>), TransportError> {
        let (stream, _) = connect_async(url).await?;
        info!("Connected to hub at {}", url);

        let (sink, source) = stream.split();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(read_frames(source, tx));

        Ok((
            WsTransport {
                sink: Mutex::new(sink),
            },
            rx,
        ))
    }

    pub async fn close(&self) -> Result<(), TransportError> {
        let mut sink = self.sink.lock().await;
        sink.close().await?;
        Ok(())
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn emit(&self, message: &ChatMessage) -> Result<(), TransportError> {
        let frame = serde_json::to_string(&EventFrame::message(message))?;
        let mut sink = self.sink.lock().await;
        sink.send(Message::text(frame)).await.map_err(|e| match e {
            tokio_tungstenite::tungstenite::Error::ConnectionClosed
            | tokio_tungstenite::tungstenite::Error::AlreadyClosed => TransportError::Closed,
            other => TransportError::WebSocket(other),
        })
    }
}

async fn read_frames(mut source: SplitStream<WsStream>, tx: mpsc::UnboundedSender<String>) {
    while let Some(result) = source.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if tx.send(text.as_str().to_owned()).is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                info!("Hub closed the connection");
                break;
            }
            Ok(other) => debug!("Ignoring non-text frame ({} bytes)", other.len()),
            Err(e) => {
                warn!("Connection to hub failed: {}", e);
                break;
            }
        }
    }
}
