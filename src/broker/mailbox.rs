use std::collections::VecDeque;

use crate::broker::message::Message;

/// FIFO queue of undelivered messages for one (user, topic) subscription.
///
/// A mailbox has no locking of its own; it is only ever reached through the
/// registry while the service lock is held.
#[derive(Debug, Default)]
pub struct Mailbox {
    buf: VecDeque<Message>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the tail. Unbounded.
    pub fn send(&mut self, message: Message) {
        self.buf.push_back(message);
    }

    /// Removes and returns the oldest message, or `None` when empty.
    pub fn pop(&mut self) -> Option<Message> {
        self.buf.pop_front()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
