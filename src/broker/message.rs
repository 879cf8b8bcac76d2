/// A published message as it sits in a subscriber's mailbox.
///
/// The payload is opaque to the broker. `timestamp` is the Unix time in
/// milliseconds at which the message was published; every subscriber's copy
/// of one publish carries the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub payload: Vec<u8>,
    pub timestamp: i64,
}

impl Message {
    /// Wraps `payload`, stamping it with the current time.
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
