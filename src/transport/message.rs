use serde::{Deserialize, Serialize};

/// Requests a client sends, one JSON text frame each.
///
/// Payloads are opaque bytes, carried as base64 strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "subscribe")]
    Subscribe { topic: String, user: String },

    #[serde(rename = "unsubscribe")]
    Unsubscribe { topic: String, user: String },

    #[serde(rename = "publish")]
    Publish {
        topic: String,
        #[serde(with = "base64_bytes")]
        payload: Vec<u8>,
    },

    #[serde(rename = "poll")]
    Poll { topic: String, user: String },
}

/// Replies from the server, exactly one per request.
///
/// `NotFound` and `NoContent` carry the same meaning as HTTP 404 and 204:
/// the user is not subscribed, or is subscribed with nothing waiting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "subscribed")]
    Subscribed { topic: String, user: String },

    #[serde(rename = "unsubscribed")]
    Unsubscribed { topic: String, user: String },

    #[serde(rename = "published")]
    Published { topic: String, delivered: usize },

    #[serde(rename = "message")]
    Message {
        topic: String,
        user: String,
        #[serde(with = "base64_bytes")]
        payload: Vec<u8>,
        timestamp: i64,
    },

    #[serde(rename = "no_content")]
    NoContent { topic: String, user: String },

    #[serde(rename = "not_found")]
    NotFound { topic: String, user: String },

    #[serde(rename = "error")]
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}

/// Serde helper for base64 encoding/decoding of payload bytes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    const ENGINE: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ENGINE.encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ENGINE.decode(&s).map_err(serde::de::Error::custom)
    }
}
