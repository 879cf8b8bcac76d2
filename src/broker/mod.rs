//! The `broker` module is the subscription and delivery engine.
//!
//! Topics and users are created on first reference by name. Each
//! subscription owns a FIFO [`Mailbox`](mailbox::Mailbox); publishing fans a
//! message out to every subscriber's mailbox and polling pops from it.
//! [`SubscriptionService`] serializes every operation behind one lock.

pub mod engine;
pub mod mailbox;
pub mod message;
pub mod topic;
pub mod user;

pub use engine::{Poll, Registry, SubscriptionService};
pub use message::Message;
