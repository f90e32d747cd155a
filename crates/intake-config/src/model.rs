//! Typed configuration sections.
//!
//! # Design
//! - Pure data carriers; IO lives in `loader.rs`, checks in `validate.rs`.
//! - Every field has a serde default so partial documents load.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::ConfigError;

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntakeConfig {
    /// Resolver deadlines.
    pub resolver: ResolverConfig,
    /// Logging settings.
    pub telemetry: TelemetryConfig,
    /// Event bus sizing.
    pub events: EventsConfig,
}

/// Deadlines applied to backend calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Deadline for every backend call other than the prefetch, in milliseconds.
    pub call_timeout_ms: u64,
    /// Deadline for `prefetch_magnet_metadata`, in milliseconds.
    pub prefetch_timeout_ms: u64,
}

impl ResolverConfig {
    /// Deadline for a regular backend call.
    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Deadline for the metadata prefetch.
    #[must_use]
    pub const fn prefetch_timeout(&self) -> Duration {
        Duration::from_millis(self.prefetch_timeout_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: defaults::CALL_TIMEOUT_MS,
            prefetch_timeout_ms: defaults::PREFETCH_TIMEOUT_MS,
        }
    }
}

/// Output format requested for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    /// Structured JSON lines.
    Json,
    /// Human-readable output.
    Pretty,
}

impl FromStr for LogFormatSetting {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(ConfigError::invalid(
                "telemetry",
                "log_format",
                s,
                "must be 'json' or 'pretty'",
            )),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Output format; inferred from the build profile when absent.
    pub log_format: Option<LogFormatSetting>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::LOG_LEVEL.to_string(),
            log_format: None,
        }
    }
}

/// Event bus sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventsConfig {
    /// Number of events retained for replay.
    pub replay_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            replay_capacity: defaults::EVENT_REPLAY_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = IntakeConfig::default();
        assert_eq!(config.resolver.call_timeout(), Duration::from_secs(60));
        assert_eq!(config.resolver.prefetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.telemetry.log_format.is_none());
        assert_eq!(config.events.replay_capacity, 1_024);
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormatSetting>().ok(), Some(LogFormatSetting::Json));
        assert_eq!(
            " pretty ".parse::<LogFormatSetting>().ok(),
            Some(LogFormatSetting::Pretty)
        );
        assert!("xml".parse::<LogFormatSetting>().is_err());
    }
}
