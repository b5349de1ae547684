use super::*;

fn valid_config() -> Config {
    let mut config = Config::default();
    config.signal.account = "+15550001111".to_string();
    config.signal.api_url = "ws://signal-api:8080".to_string();
    config
}

fn has_error(result: &ValidationResult, path: &str) -> bool {
    result.errors.iter().any(|e| e.path == path)
}

#[test]
fn test_validate_minimal_config() {
    let result = ConfigValidator::validate(&valid_config()).unwrap();
    assert!(result.is_valid(), "{:?}", result.errors);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_default_config_needs_signal() {
    let result = ConfigValidator::validate(&Config::default()).unwrap();
    assert!(has_error(&result, "signal.account"));
    assert!(has_error(&result, "signal.api_url"));
}

#[test]
fn test_validate_account_format() {
    for account in ["15550001111", "+", "+1555-000", "+1 555", "+1555\n", "++1555", "+１２３"] {
        let mut config = valid_config();
        config.signal.account = account.to_string();
        let result = ConfigValidator::validate(&config).unwrap();
        assert!(has_error(&result, "signal.account"), "{account:?} accepted");
    }

    for account in ["+1", "+491701234567"] {
        let mut config = valid_config();
        config.signal.account = account.to_string();
        let result = ConfigValidator::validate(&config).unwrap();
        assert!(!has_error(&result, "signal.account"), "{account} rejected");
    }
}

#[test]
fn test_validate_account_error_names_pattern() {
    let mut config = valid_config();
    config.signal.account = "12345".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    let error = result
        .errors
        .iter()
        .find(|e| e.path == "signal.account")
        .unwrap();
    assert!(error.message.contains(r"^\+[0-9]+$"), "{}", error.message);
}

#[test]
fn test_validate_api_url_scheme() {
    let mut config = valid_config();
    config.signal.api_url = "http://signal-api:8080".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(has_error(&result, "signal.api_url"));
}

#[test]
fn test_validate_api_url_unparseable() {
    let mut config = valid_config();
    config.signal.api_url = "signal-api".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(has_error(&result, "signal.api_url"));
}

#[test]
fn test_validate_server_addr() {
    let mut config = valid_config();
    config.server.addr = "8105".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(has_error(&result, "server.addr"));
}

#[test]
fn test_validate_empty_types_warning() {
    let mut config = valid_config();
    config.receiver.record_message_types.clear();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "receiver.record_message_types"));
}

#[test]
fn test_validate_mqtt_qos() {
    let mut config = valid_config();
    let mut mqtt = MqttConfig::new("broker");
    mqtt.qos = 3;
    config.mqtt = Some(mqtt);

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(has_error(&result, "mqtt.qos"));

    config.mqtt.as_mut().unwrap().qos = 0;
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
}

#[test]
fn test_validate_mqtt_client_id_and_server() {
    let mut config = valid_config();
    let mut mqtt = MqttConfig::new("mqtt://");
    mqtt.client_id = "  ".to_string();
    config.mqtt = Some(mqtt);

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(has_error(&result, "mqtt.server"));
    assert!(has_error(&result, "mqtt.client_id"));
}

#[test]
fn test_validate_password_without_user_warning() {
    let mut config = valid_config();
    let mut mqtt = MqttConfig::new("broker");
    mqtt.password = Some("secret".to_string());
    config.mqtt = Some(mqtt);

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "mqtt.password"));
}

#[test]
fn test_validate_unknown_log_level_warning() {
    let mut config = valid_config();
    config.logging.level = "verbose".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_into_result() {
    let result = ConfigValidator::validate(&valid_config()).unwrap();
    assert!(result.into_result().unwrap().is_empty());

    let result = ConfigValidator::validate(&Config::default()).unwrap();
    let err = result.into_result().unwrap_err();
    assert!(err.to_string().contains("signal.account"));
}

#[test]
fn test_validation_error_new() {
    let err = ValidationError::new("server.addr", "missing port");
    assert_eq!(err.path, "server.addr");
    assert_eq!(err.message, "missing port");
}
