//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that deserialize fine but
//! cannot work at runtime. All errors are collected, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ForwarderConfig;
use crate::forward::upstream::{BackendUrl, BackendUrlError};

/// A single semantic problem in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    Backend(#[from] BackendUrlError),

    #[error("upstream.marker must not be empty")]
    EmptyMarker,

    #[error("{field} {value:?} is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &ForwarderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = BackendUrl::parse(&config.upstream.base_url) {
        errors.push(e.into());
    }

    if config.upstream.marker.is_empty() {
        errors.push(ValidationError::EmptyMarker);
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);

    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ForwarderConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ForwarderConfig::default();
        config.upstream.base_url = "ftp://backend".into();
        config.upstream.marker = String::new();
        config.listener.bind_address = "not-an-address".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(
            errors[0],
            ValidationError::Backend(BackendUrlError::UnsupportedScheme { .. })
        ));
        assert_eq!(errors[1], ValidationError::EmptyMarker);
        assert!(matches!(
            errors[2],
            ValidationError::InvalidAddress { field: "listener.bind_address", .. }
        ));
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = ForwarderConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
