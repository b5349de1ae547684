//! Configuration schema definitions.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use sigrelay_protocols::MessageType;

use crate::error::ConfigError;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub signal: SignalConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub receiver: ReceiverConfig,

    /// Broker publishing is disabled when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mqtt: Option<MqttConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream Signal API settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Account number, `+` followed by digits.
    #[serde(default)]
    pub account: String,

    /// Base URL of the Signal API including the scheme, e.g. `wss://signal-api.example.com`.
    #[serde(default)]
    pub api_url: String,
}

impl SignalConfig {
    /// Websocket endpoint for the account: `{api_url}/v1/receive/{account}`.
    ///
    /// The path is appended to whatever path `api_url` already has.
    pub fn receive_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| ConfigError::invalid("signal.api_url", e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| ConfigError::invalid("signal.api_url", "URL cannot be a base"))?
            .pop_if_empty()
            .extend(["v1", "receive", self.account.as_str()]);

        Ok(url)
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// `host:port`, or `:port` to listen on every interface.
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

fn default_addr() -> String {
    ":8105".to_string()
}

impl ServerConfig {
    /// Address suitable for binding, with an empty host replaced by `0.0.0.0`.
    pub fn bind_address(&self) -> Result<String, ConfigError> {
        let (host, port) = self
            .addr
            .rsplit_once(':')
            .ok_or_else(|| ConfigError::invalid("server.addr", "expected host:port or :port"))?;

        port.parse::<u16>()
            .map_err(|e| ConfigError::invalid("server.addr", format!("invalid port: {}", e)))?;

        let host = if host.is_empty() { "0.0.0.0" } else { host };
        Ok(format!("{}:{}", host, port))
    }
}

/// Intake and delivery behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverConfig {
    /// Allow-set of types kept in the queue.
    #[serde(default = "default_record_message_types")]
    pub record_message_types: Vec<MessageType>,

    /// Serve the last delivered message again when the queue is empty.
    #[serde(default)]
    pub repeat_last_message: bool,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            record_message_types: default_record_message_types(),
            repeat_last_message: false,
        }
    }
}

fn default_record_message_types() -> Vec<MessageType> {
    vec![MessageType::DataMessage]
}

/// MQTT broker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    /// Broker `host[:port]`, optionally prefixed with `mqtt://` or `tcp://`.
    pub server: String,

    #[serde(default = "default_client_id")]
    pub client_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default = "default_topic_prefix")]
    pub topic_prefix: String,

    #[serde(default = "default_qos")]
    pub qos: u8,
}

pub const DEFAULT_MQTT_PORT: u16 = 1883;

impl MqttConfig {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            client_id: default_client_id(),
            user: None,
            password: None,
            topic_prefix: default_topic_prefix(),
            qos: default_qos(),
        }
    }

    /// Topic accepted messages are published to: `{topic_prefix}/message`.
    pub fn topic(&self) -> String {
        let prefix = self
            .topic_prefix
            .trim_matches(|c| c == '#' || c == '/' || c == ' ');
        format!("{}/message", prefix)
    }

    /// Broker host and port.
    pub fn broker_address(&self) -> Result<(String, u16), ConfigError> {
        let server = self
            .server
            .strip_prefix("mqtt://")
            .or_else(|| self.server.strip_prefix("tcp://"))
            .unwrap_or(&self.server)
            .trim_end_matches('/');

        let (host, port) = match server.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|e| {
                    ConfigError::invalid("mqtt.server", format!("invalid port: {}", e))
                })?;
                (host, port)
            }
            None => (server, DEFAULT_MQTT_PORT),
        };

        if host.is_empty() {
            return Err(ConfigError::invalid("mqtt.server", "host is missing"));
        }

        Ok((host.to_string(), port))
    }
}

fn default_client_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("signal-api-receiver-{}", &suffix[..12])
}

fn default_topic_prefix() -> String {
    "signal-api-receiver".to_string()
}

fn default_qos() -> u8 {
    1
}

/// Logging output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Also write daily-rotated log files here when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            directory: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Console log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Text on a terminal, JSON otherwise.
    #[default]
    Auto,
    Text,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Auto => write!(f, "auto"),
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(LogFormat::Auto),
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::invalid(
                "logging.format",
                format!("unknown format '{}', expected auto, text or json", other),
            )),
        }
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
