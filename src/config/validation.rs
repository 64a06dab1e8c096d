//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits and timeouts > 0)
//! - Check the bind address and log filter are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AdapterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::IpAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::AdapterConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not an IP address")]
    InvalidBindAddress(String),

    #[error("listener.max_connections must be greater than zero")]
    ZeroMaxConnections,

    #[error("timeouts.header_read_secs must be greater than zero")]
    ZeroHeaderReadTimeout,

    #[error("observability.log_level {0:?} is not a valid filter")]
    InvalidLogLevel(String),
}

/// Check an already-parsed configuration, collecting every problem.
pub fn validate_config(config: &AdapterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }

    if config.timeouts.header_read_secs == 0 {
        errors.push(ValidationError::ZeroHeaderReadTimeout);
    }

    if config.observability.log_level.trim().is_empty()
        || EnvFilter::try_new(&config.observability.log_level).is_err()
    {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&AdapterConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_error() {
        let mut config = AdapterConfig::default();
        config.listener.bind_address = "not-an-ip".into();
        config.listener.max_connections = 0;
        config.timeouts.header_read_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBindAddress("not-an-ip".into()),
                ValidationError::ZeroMaxConnections,
                ValidationError::ZeroHeaderReadTimeout,
            ]
        );
    }

    #[test]
    fn accepts_filter_expressions() {
        let mut config = AdapterConfig::default();
        config.observability.log_level = "service_adapter=debug,hyper=warn".into();
        assert!(validate_config(&config).is_ok());

        config.observability.log_level = "   ".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidLogLevel("   ".into())])
        );
    }
}
