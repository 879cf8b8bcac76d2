use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::broker::message::Message;
use crate::broker::topic::{Topic, TopicId};
use crate::broker::user::{User, UserId};

/// Outcome of polling a (topic, user) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    /// The user is not subscribed to the topic.
    NotSubscribed,
    /// Subscribed, but nothing is buffered.
    Empty,
    /// The oldest undelivered message.
    Message(Message),
}

impl Poll {
    pub fn is_subscribed(&self) -> bool {
        !matches!(self, Poll::NotSubscribed)
    }

    pub fn into_message(self) -> Option<Message> {
        match self {
            Poll::Message(message) => Some(message),
            _ => None,
        }
    }
}

/// Directory of every topic and user, resolved by name.
///
/// Entities are created on first reference and live as long as the registry.
/// Nothing here is synchronized; [`SubscriptionService`] owns the only lock.
#[derive(Debug, Default)]
pub struct Registry {
    topic_ids: HashMap<String, TopicId>,
    user_ids: HashMap<String, UserId>,
    topics: Vec<Topic>,
    users: Vec<User>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a topic by name, creating it if this is the first reference.
    pub fn get_or_create_topic(&mut self, name: &str) -> TopicId {
        if let Some(id) = self.topic_ids.get(name) {
            return *id;
        }
        let id = TopicId(self.topics.len());
        self.topics.push(Topic::new(id, name));
        self.topic_ids.insert(name.to_string(), id);
        debug!(topic = name, "created topic");
        id
    }

    /// Looks up a user by name, creating it if this is the first reference.
    pub fn get_or_create_user(&mut self, name: &str) -> UserId {
        if let Some(id) = self.user_ids.get(name) {
            return *id;
        }
        let id = UserId(self.users.len());
        self.users.push(User::new(id, name));
        self.user_ids.insert(name.to_string(), id);
        debug!(user = name, "created user");
        id
    }

    pub fn topic(&self, id: TopicId) -> Option<&Topic> {
        self.topics.get(id.0)
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(id.0)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn subscribe(&mut self, topic: &str, user: &str) {
        let topic_id = self.get_or_create_topic(topic);
        let user_id = self.get_or_create_user(user);
        self.topics[topic_id.0].subscribe(&mut self.users[user_id.0]);
    }

    pub fn unsubscribe(&mut self, topic: &str, user: &str) -> bool {
        let topic_id = self.get_or_create_topic(topic);
        let user_id = self.get_or_create_user(user);
        self.topics[topic_id.0].unsubscribe(&mut self.users[user_id.0])
    }

    pub fn publish(&mut self, topic: &str, message: Message) -> usize {
        let topic_id = self.get_or_create_topic(topic);
        self.topics[topic_id.0].publish(&message, &mut self.users)
    }

    pub fn poll_next(&mut self, topic: &str, user: &str) -> Poll {
        let topic_id = self.get_or_create_topic(topic);
        let user_id = self.get_or_create_user(user);
        self.users[user_id.0].next_message(topic_id)
    }

    /// Panics unless every subscriber set matches the users' mailbox keys.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        for topic in &self.topics {
            for user_id in &topic.subscribers {
                assert!(
                    self.users[user_id.0].is_subscribed(topic.id),
                    "{} is in {} but has no mailbox",
                    self.users[user_id.0].name,
                    topic.name
                );
            }
        }
        for user in &self.users {
            for topic_id in user.mailboxes.keys() {
                assert!(
                    self.topics[topic_id.0].subscribers.contains(&user.id),
                    "{} has a mailbox for {} but is not subscribed",
                    user.name,
                    self.topics[topic_id.0].name
                );
            }
        }
    }
}

/// The subscription and delivery engine.
///
/// Every operation takes the single service-wide lock, resolves names through
/// the [`Registry`], runs the entity operation and releases the lock. No two
/// operations ever run concurrently, whichever topic or user they touch.
/// Operations are plain map and queue manipulations, so the lock is never held
/// across I/O and nothing blocks waiting for a publish.
#[derive(Debug, Default)]
pub struct SubscriptionService {
    registry: Mutex<Registry>,
}

impl SubscriptionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `user` to `topic`. Repeating it is a no-op.
    pub fn subscribe(&self, topic: &str, user: &str) {
        self.lock().subscribe(topic, user);
        debug!(topic, user, "subscribed");
    }

    /// Unsubscribes `user` from `topic`, dropping any buffered messages.
    /// Returns whether the user was subscribed.
    pub fn unsubscribe(&self, topic: &str, user: &str) -> bool {
        let was_subscribed = self.lock().unsubscribe(topic, user);
        debug!(topic, user, was_subscribed, "unsubscribed");
        was_subscribed
    }

    /// Fans `payload` out to every current subscriber of `topic`.
    ///
    /// Returns how many mailboxes received it. With no subscribers the
    /// message is dropped and 0 is returned.
    pub fn publish(&self, topic: &str, payload: impl Into<Vec<u8>>) -> usize {
        let message = Message::new(payload);
        let delivered = self.lock().publish(topic, message);
        debug!(topic, delivered, "published");
        delivered
    }

    /// Pops the next message for (`topic`, `user`) without waiting.
    pub fn poll_next(&self, topic: &str, user: &str) -> Poll {
        let poll = self.lock().poll_next(topic, user);
        debug!(topic, user, subscribed = poll.is_subscribed(), "polled");
        poll
    }

    /// Runs `f` against the registry under the service lock.
    pub fn with_registry<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        f(&self.lock())
    }

    // No operation panics halfway through a mutation, so the state behind a
    // poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
