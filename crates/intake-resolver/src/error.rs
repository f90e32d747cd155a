//! # Design
//!
//! - Errors raised while wiring the resolver to its configuration, telemetry and event bus.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Submission failures are not errors here; they travel as `ResolveError` outcomes.

use thiserror::Error;

/// Result alias for bootstrap operations.
pub type IntakeResult<T> = Result<T, IntakeError>;

/// Bootstrap-level error type.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Configuration failed validation.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: intake_config::ConfigError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: intake_telemetry::TelemetryError,
    },
    /// Event bus construction failed.
    #[error("event bus operation failed")]
    Events {
        /// Operation identifier.
        operation: &'static str,
        /// Source event bus error.
        source: intake_events::EventBusError,
    },
}

impl IntakeError {
    pub(crate) const fn config(
        operation: &'static str,
        source: intake_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: intake_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn events(
        operation: &'static str,
        source: intake_events::EventBusError,
    ) -> Self {
        Self::Events { operation, source }
    }
}
