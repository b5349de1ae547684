//! Configuration validation.

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::{Config, MqttConfig};

const ACCOUNT_PATTERN: &str = r"^\+[0-9]+$";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Collapse into the warnings, or a single [`ConfigError::Invalid`] listing every error.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        if self.is_valid() {
            return Ok(self.warnings);
        }
        Err(ConfigError::Invalid(
            self.errors
                .into_iter()
                .map(|e| format!("{}: {}", e.path, e.message))
                .collect(),
        ))
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_signal(config, &mut result);
        Self::validate_server(config, &mut result);
        Self::validate_receiver(config, &mut result);
        if let Some(mqtt) = &config.mqtt {
            Self::validate_mqtt(mqtt, &mut result);
        }
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    fn validate_signal(config: &Config, result: &mut ValidationResult) {
        let account = &config.signal.account;
        if account.is_empty() {
            result.add_error(ValidationError::new(
                "signal.account",
                "Account is required",
            ));
        } else if !is_account_number(account) {
            result.add_error(ValidationError::new(
                "signal.account",
                format!("'{}' does not match {}", account, ACCOUNT_PATTERN),
            ));
        }

        if config.signal.api_url.is_empty() {
            result.add_error(ValidationError::new(
                "signal.api_url",
                "API URL is required",
            ));
            return;
        }

        match config.signal.receive_url() {
            Ok(url) => {
                if !matches!(url.scheme(), "ws" | "wss") {
                    result.add_error(ValidationError::new(
                        "signal.api_url",
                        format!("scheme must be ws or wss, got '{}'", url.scheme()),
                    ));
                }
                if url.host_str().is_none_or(str::is_empty) {
                    result.add_error(ValidationError::new(
                        "signal.api_url",
                        "host is missing",
                    ));
                }
            }
            Err(e) => result.add_error(ValidationError::new("signal.api_url", e.to_string())),
        }
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if let Err(e) = config.server.bind_address() {
            result.add_error(ValidationError::new("server.addr", e.to_string()));
        }
    }

    fn validate_receiver(config: &Config, result: &mut ValidationResult) {
        if config.receiver.record_message_types.is_empty() {
            result.add_warning(ValidationWarning::new(
                "receiver.record_message_types",
                "No message types are recorded, every incoming message will be dropped",
            ));
        }
    }

    fn validate_mqtt(mqtt: &MqttConfig, result: &mut ValidationResult) {
        if let Err(e) = mqtt.broker_address() {
            result.add_error(ValidationError::new("mqtt.server", e.to_string()));
        }

        if mqtt.client_id.trim().is_empty() {
            result.add_error(ValidationError::new(
                "mqtt.client_id",
                "Client id cannot be empty",
            ));
        }

        if mqtt.qos > 2 {
            result.add_error(ValidationError::new(
                "mqtt.qos",
                format!("QoS must be 0, 1 or 2, got {}", mqtt.qos),
            ));
        }

        if mqtt.password.is_some() && mqtt.user.is_none() {
            result.add_warning(ValidationWarning::new(
                "mqtt.password",
                "Password is set without a user and will be ignored",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?}",
                    config.logging.level, LOG_LEVELS
                ),
            ));
        }
    }
}

fn is_account_number(account: &str) -> bool {
    Regex::new(ACCOUNT_PATTERN).is_ok_and(|re| re.is_match(account))
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
