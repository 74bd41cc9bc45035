//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ConsumerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ConsumerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ConsumerConfig, ConfigError> {
    let config: ConsumerConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [consumer]
            queue = "flight.received"
            max_concurrent_deliveries = 4

            [tracing]
            service_name = "flights"
            collector_endpoint = "http://localhost:4317"

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.consumer.max_concurrent_deliveries, 4);
        assert_eq!(config.tracing.service_name, "flights");
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[consumer\nqueue = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error"));
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let err = parse_config(
            r#"
            [consumer]
            queue = ""
            max_concurrent_deliveries = 0
            "#,
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("consumer.queue"));
        assert!(message.contains("consumer.max_concurrent_deliveries"));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join(format!("missing-{}.toml", uuid::Uuid::new_v4()));
        assert!(matches!(load_config(&path), Err(ConfigError::Io(_))));
    }
}
