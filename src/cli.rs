//! CLI definitions for sigrelay.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use sigrelay_config::{Config, LogFormat, MqttConfig};
use sigrelay_protocols::MessageType;

/// sigrelay CLI.
#[derive(Parser)]
#[command(name = "sigrelay")]
#[command(about = "Relay the Signal receive API to a pull-based HTTP API and MQTT")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SIGRELAY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Serve options used when no subcommand is given
    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Options for the serve command, whichever way it was invoked.
    pub fn into_serve_args(self) -> ServeArgs {
        match self.command {
            Some(Commands::Serve(args)) => args,
            None => self.serve,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Relay messages and serve the HTTP API (default)
    #[command(alias = "s")]
    Serve(ServeArgs),
}

/// Flags and environment variables overriding the configuration file.
#[derive(Args, Default)]
pub(crate) struct ServeArgs {
    /// Signal account number, e.g. +15550001111
    #[arg(long, env = "SIGNAL_ACCOUNT")]
    pub signal_account: Option<String>,

    /// Signal API base URL including the scheme, e.g. wss://signal-api.example.com
    #[arg(long, env = "SIGNAL_API_URL")]
    pub signal_api_url: Option<String>,

    /// HTTP listen address, host:port or :port
    #[arg(long, env = "SERVER_ADDR")]
    pub server_addr: Option<String>,

    /// Message types to record (receipt, typing, data, data-message, sync)
    #[arg(long = "record-message-type", env = "RECORD_MESSAGE_TYPES", value_delimiter = ',')]
    pub record_message_types: Vec<MessageType>,

    /// Serve the last delivered message again when the queue is empty
    #[arg(long, env = "REPEAT_LAST_MESSAGE")]
    pub repeat_last_message: bool,

    /// MQTT broker, host[:port]; enables broadcasting
    #[arg(long, env = "MQTT_SERVER")]
    pub mqtt_server: Option<String>,

    /// MQTT client id
    #[arg(long, env = "MQTT_CLIENT_ID")]
    pub mqtt_client_id: Option<String>,

    /// MQTT user
    #[arg(long, env = "MQTT_USER")]
    pub mqtt_user: Option<String>,

    /// MQTT password
    #[arg(long, env = "MQTT_PASSWORD", hide_env_values = true)]
    pub mqtt_password: Option<String>,

    /// MQTT topic prefix
    #[arg(long, env = "MQTT_TOPIC_PREFIX")]
    pub mqtt_topic_prefix: Option<String>,

    /// MQTT QoS level (0, 1 or 2)
    #[arg(long, env = "MQTT_QOS")]
    pub mqtt_qos: Option<u8>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Console log format (auto, text, json)
    #[arg(long, env = "LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Also write daily-rotated log files to this directory
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl ServeArgs {
    /// Overlay the given options on `config`.
    ///
    /// MQTT options other than the server only apply once a broker is configured.
    pub fn apply(self, config: &mut Config) {
        if let Some(account) = self.signal_account {
            config.signal.account = account;
        }
        if let Some(api_url) = self.signal_api_url {
            config.signal.api_url = api_url;
        }
        if let Some(addr) = self.server_addr {
            config.server.addr = addr;
        }
        if !self.record_message_types.is_empty() {
            config.receiver.record_message_types = self.record_message_types;
        }
        if self.repeat_last_message {
            config.receiver.repeat_last_message = true;
        }

        if let Some(server) = self.mqtt_server {
            match config.mqtt.as_mut() {
                Some(mqtt) => mqtt.server = server,
                None => config.mqtt = Some(MqttConfig::new(server)),
            }
        }
        if let Some(mqtt) = config.mqtt.as_mut() {
            if let Some(client_id) = self.mqtt_client_id {
                mqtt.client_id = client_id;
            }
            if let Some(user) = self.mqtt_user {
                mqtt.user = Some(user);
            }
            if let Some(password) = self.mqtt_password {
                mqtt.password = Some(password);
            }
            if let Some(prefix) = self.mqtt_topic_prefix {
                mqtt.topic_prefix = prefix;
            }
            if let Some(qos) = self.mqtt_qos {
                mqtt.qos = qos;
            }
        }

        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some(dir) = self.log_dir {
            config.logging.directory = Some(dir);
        }
    }
}
