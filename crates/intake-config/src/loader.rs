//! Loading configuration from JSON documents and the process environment.
//!
//! Environment overrides are layered on top of defaults (or a parsed
//! document) and read through a lookup closure so tests never touch the real
//! process environment.

use std::str::FromStr;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{IntakeConfig, LogFormatSetting};

/// Prefix shared by every recognised environment variable.
pub const ENV_PREFIX: &str = "INTAKE_";

const CALL_TIMEOUT_MS: &str = "INTAKE_CALL_TIMEOUT_MS";
const PREFETCH_TIMEOUT_MS: &str = "INTAKE_PREFETCH_TIMEOUT_MS";
const LOG_LEVEL: &str = "INTAKE_LOG_LEVEL";
const LOG_FORMAT: &str = "INTAKE_LOG_FORMAT";
const EVENT_REPLAY_CAPACITY: &str = "INTAKE_EVENT_REPLAY_CAPACITY";

impl IntakeConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed documents and
    /// [`ConfigError::InvalidField`] when validation fails.
    pub fn from_json_str(document: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(document).map_err(|source| ConfigError::Parse { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with `INTAKE_*` variables from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a variable cannot be parsed and
    /// [`ConfigError::InvalidField`] when validation fails.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with variables resolved through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`IntakeConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay any variables resolved through `lookup` onto this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a variable cannot be parsed.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(CALL_TIMEOUT_MS) {
            self.resolver.call_timeout_ms = parse_env(CALL_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = lookup(PREFETCH_TIMEOUT_MS) {
            self.resolver.prefetch_timeout_ms = parse_env(PREFETCH_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = lookup(LOG_LEVEL) {
            debug!(variable = LOG_LEVEL, "applying environment override");
            self.telemetry.log_level = value;
        }
        if let Some(value) = lookup(LOG_FORMAT) {
            let format = LogFormatSetting::from_str(&value).map_err(|_| ConfigError::Env {
                name: LOG_FORMAT.to_string(),
                value: value.clone(),
                reason: "must be 'json' or 'pretty'",
            })?;
            self.telemetry.log_format = Some(format);
        }
        if let Some(value) = lookup(EVENT_REPLAY_CAPACITY) {
            self.events.replay_capacity = parse_env(EVENT_REPLAY_CAPACITY, &value)?;
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> ConfigResult<T> {
    debug!(variable = name, "applying environment override");
    value.trim().parse().map_err(|_| ConfigError::Env {
        name: name.to_string(),
        value: value.to_string(),
        reason: "must be a non-negative integer",
    })
}
