use std::collections::HashMap;

use crate::broker::engine::Poll;
use crate::broker::mailbox::Mailbox;
use crate::broker::message::Message;
use crate::broker::topic::TopicId;

/// Opaque handle of a user inside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub(crate) usize);

/// A named subscriber holding one mailbox per subscribed topic.
///
/// The key set of `mailboxes` always equals the set of topics whose
/// subscriber set contains this user. Only [`Topic`](crate::broker::topic::Topic)
/// attaches and detaches mailboxes, so both sides change together.
#[derive(Debug)]
pub struct User {
    pub(crate) id: UserId,
    pub name: String,
    pub(crate) mailboxes: HashMap<TopicId, Mailbox>,
}

impl User {
    pub(crate) fn new(id: UserId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            mailboxes: HashMap::new(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn is_subscribed(&self, topic: TopicId) -> bool {
        self.mailboxes.contains_key(&topic)
    }

    /// Pops the next message for `topic`.
    ///
    /// Not being subscribed is reported as [`Poll::NotSubscribed`], which is
    /// distinct from a subscribed user with an empty mailbox.
    pub fn next_message(&mut self, topic: TopicId) -> Poll {
        match self.mailboxes.get_mut(&topic) {
            None => Poll::NotSubscribed,
            Some(mailbox) => match mailbox.pop() {
                Some(message) => Poll::Message(message),
                None => Poll::Empty,
            },
        }
    }

    /// Creates a fresh mailbox for `topic`.
    pub(crate) fn attach(&mut self, topic: TopicId) {
        self.mailboxes.insert(topic, Mailbox::new());
    }

    /// Drops the mailbox for `topic` along with anything still buffered.
    pub(crate) fn detach(&mut self, topic: TopicId) {
        self.mailboxes.remove(&topic);
    }

    /// Appends to the mailbox for `topic`. Returns false if there is none.
    pub(crate) fn deliver(&mut self, topic: TopicId, message: Message) -> bool {
        match self.mailboxes.get_mut(&topic) {
            Some(mailbox) => {
                mailbox.send(message);
                true
            }
            None => false,
        }
    }
}
