//! Maps protocol requests onto [`SubscriptionService`] operations.
//!
//! Everything here is synchronous: the service lock is taken and released
//! inside each call, never held while a frame is read or written.

use crate::broker::{Poll, SubscriptionService};
use crate::transport::message::{ClientMessage, ServerMessage};

/// Runs one request against the service and builds its reply.
pub fn handle_client_message(service: &SubscriptionService, msg: ClientMessage) -> ServerMessage {
    if let Some(reply) = validate(&msg) {
        return reply;
    }

    match msg {
        ClientMessage::Subscribe { topic, user } => {
            service.subscribe(&topic, &user);
            ServerMessage::Subscribed { topic, user }
        }
        ClientMessage::Unsubscribe { topic, user } => {
            if service.unsubscribe(&topic, &user) {
                ServerMessage::Unsubscribed { topic, user }
            } else {
                ServerMessage::NotFound { topic, user }
            }
        }
        ClientMessage::Publish { topic, payload } => {
            let delivered = service.publish(&topic, payload);
            ServerMessage::Published { topic, delivered }
        }
        ClientMessage::Poll { topic, user } => match service.poll_next(&topic, &user) {
            Poll::NotSubscribed => ServerMessage::NotFound { topic, user },
            Poll::Empty => ServerMessage::NoContent { topic, user },
            Poll::Message(message) => ServerMessage::Message {
                topic,
                user,
                payload: message.payload,
                timestamp: message.timestamp,
            },
        },
    }
}

/// Parses a text frame and handles it. Unparseable frames get an error reply.
pub fn handle_text(service: &SubscriptionService, text: &str) -> ServerMessage {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => handle_client_message(service, msg),
        Err(err) => ServerMessage::error(format!("invalid request: {err}")),
    }
}

fn validate(msg: &ClientMessage) -> Option<ServerMessage> {
    let (topic, user) = match msg {
        ClientMessage::Subscribe { topic, user }
        | ClientMessage::Unsubscribe { topic, user }
        | ClientMessage::Poll { topic, user } => (topic, Some(user)),
        ClientMessage::Publish { topic, .. } => (topic, None),
    };

    if topic.is_empty() {
        return Some(ServerMessage::error("topic must not be empty"));
    }
    if user.is_some_and(|user| user.is_empty()) {
        return Some(ServerMessage::error("user must not be empty"));
    }
    None
}
