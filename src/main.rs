//! CLI for PollSub
//!
//! Subcommands:
//! - `server`: run the HTTP and WebSocket servers
//! - `client`: subscribe, publish and poll once (useful for smoke tests)

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use pollsub::broker::SubscriptionService;
use pollsub::client::PubSubClient;
use pollsub::config::load_config;
use pollsub::transport::{start_http_server, start_websocket_server};
use pollsub::utils::{Result, logging};

#[derive(Parser)]
#[command(name = "pollsub")]
enum Command {
    /// Start the HTTP and WebSocket servers
    Server,
    /// Subscribe, publish one message and poll it back
    Client {
        /// WebSocket server URL to connect to
        #[arg(long, default_value = "ws://127.0.0.1:3000")]
        url: String,
        #[arg(long, default_value = "chat")]
        topic: String,
        #[arg(long, default_value = "example")]
        user: String,
        #[arg(long, default_value = "Hello from pollsub")]
        message: String,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cmd = Command::parse();

    match cmd {
        Command::Server => {
            if let Err(e) = run_server().await {
                error!("Server failed: {}", e);
            }
        }
        Command::Client {
            url,
            topic,
            user,
            message,
        } => {
            logging::init("info");
            if let Err(e) = run_client(&url, &topic, &user, &message).await {
                error!("Client failed: {}", e);
            }
        }
    }
}

async fn run_server() -> Result<()> {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            return Err(e);
        }
    };
    logging::init(&config.logging.level);

    let ws_addr = config.bind_addr();
    let http_addr = config.http_bind_addr();
    let service = Arc::new(SubscriptionService::new());

    tokio::select! {
        res = start_websocket_server(&ws_addr, service.clone(), &config.broker) => {
            res?;
            error!("WebSocket server exited unexpectedly.");
        }
        res = start_http_server(&http_addr, service) => {
            res?;
            error!("HTTP server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}

async fn run_client(url: &str, topic: &str, user: &str, message: &str) -> Result<()> {
    let mut client = PubSubClient::connect(url).await?;

    println!("Subscribe: {:?}", client.subscribe(topic, user).await?);
    println!("Publish: {:?}", client.publish(topic, message.as_bytes()).await?);
    println!("Poll: {:?}", client.poll(topic, user).await?);
    println!("Poll: {:?}", client.poll(topic, user).await?);

    client.close().await
}
