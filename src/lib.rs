//! # PollSub
//!
//! `pollsub` is an in-memory publish/subscribe broker with pull-based
//! delivery. Users subscribe to named topics, publishers push messages to a
//! topic, and each subscriber polls for its next undelivered message.
//!
//! ## Core Modules
//!
//! - `broker`: topics, users and per-subscription mailboxes, behind one lock.
//! - `transport`: HTTP routes and a JSON request/response protocol over
//!   WebSockets, both serving one shared service.
//! - `client`: an async client for that protocol.
//! - `config`: loading server configuration from files and the environment.
//! - `utils`: shared error type and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod transport;
pub mod utils;

pub use broker::{Message, Poll, SubscriptionService};
