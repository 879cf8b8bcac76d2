//! Client for the pollsub WebSocket protocol.
//!
//! `PubSubClient` sends one request at a time and waits for its reply, so
//! replies always line up with the requests that caused them.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;
use tungstenite::protocol::Message as WsMessage;

use crate::transport::message::{ClientMessage, ServerMessage};
use crate::utils::error::{Error, Result};

pub struct PubSubClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl PubSubClient {
    /// Connects to a server, e.g. `ws://127.0.0.1:3000`.
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _response) = connect_async(url).await?;
        debug!(url, "connected");
        Ok(Self { stream })
    }

    pub async fn subscribe(&mut self, topic: &str, user: &str) -> Result<ServerMessage> {
        self.request(&ClientMessage::Subscribe {
            topic: topic.to_string(),
            user: user.to_string(),
        })
        .await
    }

    pub async fn unsubscribe(&mut self, topic: &str, user: &str) -> Result<ServerMessage> {
        self.request(&ClientMessage::Unsubscribe {
            topic: topic.to_string(),
            user: user.to_string(),
        })
        .await
    }

    pub async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<ServerMessage> {
        self.request(&ClientMessage::Publish {
            topic: topic.to_string(),
            payload: payload.to_vec(),
        })
        .await
    }

    pub async fn poll(&mut self, topic: &str, user: &str) -> Result<ServerMessage> {
        self.request(&ClientMessage::Poll {
            topic: topic.to_string(),
            user: user.to_string(),
        })
        .await
    }

    /// Sends `msg` and waits for the reply.
    pub async fn request(&mut self, msg: &ClientMessage) -> Result<ServerMessage> {
        let text = serde_json::to_string(msg)?;
        self.stream.send(WsMessage::text(text)).await?;
        self.next_reply().await
    }

    /// Sends a raw text frame and waits for the reply.
    pub async fn request_raw(&mut self, text: &str) -> Result<ServerMessage> {
        self.stream.send(WsMessage::text(text.to_string())).await?;
        self.next_reply().await
    }

    /// Performs the closing handshake.
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }

    async fn next_reply(&mut self) -> Result<ServerMessage> {
        while let Some(frame) = self.stream.next().await {
            match frame? {
                WsMessage::Text(text) => return Ok(serde_json::from_str(text.as_str())?),
                WsMessage::Close(_) => break,
                _ => continue,
            }
        }
        Err(Error::ConnectionClosed)
    }
}
