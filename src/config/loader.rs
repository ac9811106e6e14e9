//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ForwarderConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming the backend base URL.
pub const BACKEND_URL_ENV: &str = "API_SERVER_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub backend_url: Option<String>,
    pub static_dir: Option<String>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut ForwarderConfig) {
        if let Some(addr) = &self.bind_address {
            config.listener.bind_address = addr.clone();
        }
        if let Some(url) = &self.backend_url {
            config.upstream.base_url = url.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.host.static_dir = Some(dir.clone());
        }
    }
}

/// Parse a TOML configuration file without validating it.
pub fn read_config(path: &Path) -> Result<ForwarderConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables onto `config`.
///
/// An unset or empty `API_SERVER_URL` leaves the configured backend alone.
pub fn apply_env<F>(config: &mut ForwarderConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(BACKEND_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.upstream.base_url = url;
    }
}

/// Resolve the effective configuration: defaults, then the optional file,
/// then the process environment, then command-line overrides. The result is
/// validated before it is returned.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ForwarderConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => ForwarderConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok());
    overrides.apply(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
