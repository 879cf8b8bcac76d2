//! The `transport` module exposes the broker to clients.
//!
//! It carries the same four operations over two surfaces: plain HTTP routes
//! with raw byte bodies, and a JSON request/response protocol over
//! WebSockets. Both call into one shared
//! [`SubscriptionService`](crate::broker::SubscriptionService).

pub mod handler;
pub mod http;
pub mod message;
pub mod websocket;

pub use handler::handle_client_message;
pub use http::{HttpServer, start_http_server};
pub use message::{ClientMessage, ServerMessage};
pub use websocket::{WebSocketServer, start_websocket_server};

#[cfg(test)]
mod http_tests;
#[cfg(test)]
mod tests;
