//! The `error` module defines the error type shared by the configuration,
//! transport and client layers of `pollsub`.
//!
//! The broker itself never fails: "not subscribed" and "empty mailbox" are
//! ordinary results, not errors.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded or deserialized
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Configuration loaded but holds an unusable value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Socket bind/accept failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// WebSocket handshake or framing failed
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// JSON serialization/deserialization failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The peer closed the connection before replying
    #[error("connection closed")]
    ConnectionClosed,
}
