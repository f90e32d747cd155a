//! Post-load validation of configuration documents.

use crate::error::{ConfigError, ConfigResult};
use crate::model::IntakeConfig;

impl IntakeConfig {
    /// Reject values the resolver cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        ensure_positive("resolver", "call_timeout_ms", self.resolver.call_timeout_ms)?;
        ensure_positive(
            "resolver",
            "prefetch_timeout_ms",
            self.resolver.prefetch_timeout_ms,
        )?;
        if self.telemetry.log_level.trim().is_empty() {
            return Err(ConfigError::invalid(
                "telemetry",
                "log_level",
                &self.telemetry.log_level,
                "must not be empty",
            ));
        }
        if self.events.replay_capacity == 0 {
            return Err(ConfigError::invalid(
                "events",
                "replay_capacity",
                self.events.replay_capacity,
                "must be positive",
            ));
        }
        Ok(())
    }
}

fn ensure_positive(section: &'static str, field: &'static str, value: u64) -> ConfigResult<()> {
    if value == 0 {
        return Err(ConfigError::invalid(section, field, value, "must be positive"));
    }
    Ok(())
}
