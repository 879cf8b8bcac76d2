//! HTTP transport
//!
//! The same four broker operations as plain HTTP routes:
//!
//! | Route | Operation | Status |
//! |---|---|---|
//! | `POST /{topic}/{user}` | subscribe | 200 |
//! | `DELETE /{topic}/{user}` | unsubscribe | 200, 404 if not subscribed |
//! | `POST /{topic}` | publish the request body | 200 |
//! | `GET /{topic}/{user}` | poll | 200 with the payload, 204 if empty, 404 if not subscribed |
//!
//! Bodies are raw bytes in both directions.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use tokio::net::TcpListener;
use tracing::info;

use crate::broker::{Poll, SubscriptionService};
use crate::utils::error::Result;

/// Response header carrying the publish time in Unix milliseconds.
pub const PUBLISHED_AT_HEADER: &str = "x-published-at";

type SharedService = State<Arc<SubscriptionService>>;

/// Builds the router over `service`.
pub fn router(service: Arc<SubscriptionService>) -> Router {
    Router::new()
        .route("/{topic}", post(publish))
        .route(
            "/{topic}/{user}",
            post(subscribe).delete(unsubscribe).get(poll),
        )
        .with_state(service)
}

pub struct HttpServer {
    listener: TcpListener,
    service: Arc<SubscriptionService>,
}

impl HttpServer {
    /// Binds the listener. Use port 0 to let the OS pick one.
    pub async fn bind(addr: &str, service: Arc<SubscriptionService>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, service })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves requests until the task is dropped.
    pub async fn run(self) -> Result<()> {
        info!("HTTP server listening on http://{}", self.local_addr()?);
        axum::serve(self.listener, router(self.service)).await?;
        Ok(())
    }
}

/// Binds to `addr` and serves until the task is dropped.
pub async fn start_http_server(addr: &str, service: Arc<SubscriptionService>) -> Result<()> {
    HttpServer::bind(addr, service).await?.run().await
}

async fn subscribe(
    State(service): SharedService,
    Path((topic, user)): Path<(String, String)>,
) -> StatusCode {
    service.subscribe(&topic, &user);
    StatusCode::OK
}

async fn unsubscribe(
    State(service): SharedService,
    Path((topic, user)): Path<(String, String)>,
) -> StatusCode {
    if service.unsubscribe(&topic, &user) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn publish(
    State(service): SharedService,
    Path(topic): Path<String>,
    body: Bytes,
) -> StatusCode {
    service.publish(&topic, body.to_vec());
    StatusCode::OK
}

async fn poll(
    State(service): SharedService,
    Path((topic, user)): Path<(String, String)>,
) -> Response {
    match service.poll_next(&topic, &user) {
        Poll::NotSubscribed => StatusCode::NOT_FOUND.into_response(),
        Poll::Empty => StatusCode::NO_CONTENT.into_response(),
        Poll::Message(message) => (
            [
                (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                (
                    HeaderName::from_static(PUBLISHED_AT_HEADER),
                    message.timestamp.to_string(),
                ),
            ],
            message.payload,
        )
            .into_response(),
    }
}
