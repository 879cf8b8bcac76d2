//! WebSocket transport
//!
//! A minimal WebSocket server that translates protocol JSON requests into
//! broker operations:
//! - Accept TCP/WebSocket connections, up to `broker.max_connections` at once
//! - Read one JSON request per text frame and answer it with one JSON reply
//! - Keep the connection open across malformed requests

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio_tungstenite::accept_async;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

use crate::broker::SubscriptionService;
use crate::config::BrokerSettings;
use crate::transport::handler::handle_text;
use crate::transport::message::ServerMessage;
use crate::utils::error::Result;

pub struct WebSocketServer {
    listener: TcpListener,
    service: Arc<SubscriptionService>,
    connections: Arc<Semaphore>,
}

impl WebSocketServer {
    /// Binds the listener. Use port 0 to let the OS pick one.
    pub async fn bind(
        addr: &str,
        service: Arc<SubscriptionService>,
        settings: &BrokerSettings,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let permits = settings.max_connections.min(Semaphore::MAX_PERMITS);
        if permits == 0 {
            warn!("max_connections is 0, every connection will be refused");
        }

        Ok(Self {
            listener,
            service,
            connections: Arc::new(Semaphore::new(permits)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the task is dropped.
    pub async fn run(self) -> Result<()> {
        info!("WebSocket server listening on ws://{}", self.local_addr()?);

        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            let Ok(permit) = self.connections.clone().try_acquire_owned() else {
                warn!(%peer, "connection limit reached, dropping connection");
                drop(stream);
                continue;
            };

            let service = self.service.clone();
            tokio::spawn(async move {
                let _permit = permit;
                let client_id = format!("client-{}", Uuid::new_v4());
                debug!(client_id, %peer, "accepted connection");

                if let Err(e) = handle_connection(stream, &client_id, &service).await {
                    warn!(client_id, error = %e, "connection ended with error");
                }
                debug!(client_id, "disconnected");
            });
        }
    }
}

/// Binds to `addr` and serves until the task is dropped.
pub async fn start_websocket_server(
    addr: &str,
    service: Arc<SubscriptionService>,
    settings: &BrokerSettings,
) -> Result<()> {
    WebSocketServer::bind(addr, service, settings)
        .await?
        .run()
        .await
}

async fn handle_connection(
    stream: TcpStream,
    client_id: &str,
    service: &SubscriptionService,
) -> Result<()> {
    let mut ws_stream = accept_async(stream).await?;

    while let Some(frame) = ws_stream.next().await {
        let reply = match frame? {
            WsMessage::Text(text) => handle_text(service, text.as_str()),
            WsMessage::Binary(_) => ServerMessage::error("binary frames are not supported"),
            // Ping/pong and close replies are handled by tungstenite.
            _ => continue,
        };

        if let ServerMessage::Error { message } = &reply {
            warn!(client_id, reason = %message, "rejected request");
        }

        let text = serde_json::to_string(&reply)?;
        ws_stream.send(WsMessage::text(text)).await?;
    }

    Ok(())
}
