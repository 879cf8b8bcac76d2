use std::collections::HashSet;

use crate::broker::message::Message;
use crate::broker::user::{User, UserId};

/// Opaque handle of a topic inside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicId(pub(crate) usize);

/// Represents a topic in the broker system.
///
/// A topic is identified by its name and tracks the set of users currently
/// subscribed to it. Subscribing and unsubscribing go through the topic,
/// which keeps its subscriber set and the users' mailboxes in step.
#[derive(Debug)]
pub struct Topic {
    pub(crate) id: TopicId,
    pub name: String,
    pub(crate) subscribers: HashSet<UserId>,
}

impl Topic {
    pub(crate) fn new(id: TopicId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            subscribers: HashSet::new(),
        }
    }

    pub fn id(&self) -> TopicId {
        self.id
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Subscribes `user` to the topic and gives it an empty mailbox.
    /// If the user is already subscribed, it has no effect.
    pub fn subscribe(&mut self, user: &mut User) {
        if !self.subscribers.insert(user.id()) {
            return;
        }
        user.attach(self.id);
    }

    /// Unsubscribes `user`, discarding its mailbox and buffered messages.
    /// Returns false, changing nothing, if the user was not subscribed.
    pub fn unsubscribe(&mut self, user: &mut User) -> bool {
        if !self.subscribers.remove(&user.id()) {
            return false;
        }
        user.detach(self.id);
        true
    }

    /// Delivers a copy of `message` to every current subscriber's mailbox.
    ///
    /// `users` is the registry's user table, indexed by [`UserId`]. Returns
    /// the number of mailboxes the message reached.
    pub fn publish(&self, message: &Message, users: &mut [User]) -> usize {
        let mut delivered = 0;
        for id in &self.subscribers {
            if let Some(user) = users.get_mut(id.0) {
                if user.deliver(self.id, message.clone()) {
                    delivered += 1;
                }
            }
        }
        delivered
    }
}
