//! The `client` module provides an async client for the pollsub protocol,
//! used by the `pollsub client` command and the end-to-end tests.

pub mod pubsub_client;
pub use pubsub_client::PubSubClient;
