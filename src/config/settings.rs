use serde::Deserialize;

use crate::utils::error::{Error, Result};

/// Top-level configuration settings for the application.
///
/// Includes settings for the server, the broker and logging.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub server: ServerSettings,
    pub broker: BrokerSettings,
    pub logging: LoggingSettings,
}

/// Configuration settings for the server.
///
/// Defines the host both listeners bind to, the WebSocket `port` and the
/// HTTP `http_port`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub http_port: u16,
}

/// Configuration settings for the broker.
///
/// `max_connections` caps the number of concurrently open WebSocket
/// connections and must be at least 1.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BrokerSettings {
    pub max_connections: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize, Default)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub broker: Option<PartialBrokerSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub http_port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub max_connections: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Settings {
    /// Fills every value missing from `partial` with the default.
    pub fn merged(partial: PartialSettings) -> Self {
        let default = Settings::default();
        let server = partial.server;
        let broker = partial.broker;
        let logging = partial.logging;

        Settings {
            server: ServerSettings {
                host: server
                    .as_ref()
                    .and_then(|s| s.host.clone())
                    .unwrap_or(default.server.host),
                port: server
                    .as_ref()
                    .and_then(|s| s.port)
                    .unwrap_or(default.server.port),
                http_port: server
                    .as_ref()
                    .and_then(|s| s.http_port)
                    .unwrap_or(default.server.http_port),
            },
            broker: BrokerSettings {
                max_connections: broker
                    .as_ref()
                    .and_then(|b| b.max_connections)
                    .unwrap_or(default.broker.max_connections),
            },
            logging: LoggingSettings {
                level: logging
                    .and_then(|l| l.level)
                    .unwrap_or(default.logging.level),
            },
        }
    }

    /// The `host:port` address the WebSocket server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// The `host:http_port` address the HTTP server binds to.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.http_port)
    }

    /// Rejects values the servers cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.broker.max_connections == 0 {
            return Err(Error::InvalidConfig(
                "broker.max_connections must be at least 1".to_string(),
            ));
        }
        if self.server.port == self.server.http_port && self.server.port != 0 {
            return Err(Error::InvalidConfig(format!(
                "server.port and server.http_port are both {}",
                self.server.port
            )));
        }
        Ok(())
    }
}

/// Provides default values for `Settings`.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
                http_port: 3001,
            },
            broker: BrokerSettings {
                max_connections: 1024,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}
