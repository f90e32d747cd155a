//! Wiring from configuration to a ready resolver.

use std::sync::Arc;

use intake_config::{IntakeConfig, LogFormatSetting};
use intake_events::EventBus;
use intake_telemetry::{LogFormat, LoggingConfig, Metrics, build_sha, init_logging};
use intake_torrent_core::IngestBackend;
use tracing::info;

use crate::error::{IntakeError, IntakeResult};
use crate::resolver::TorrentSourceResolver;

/// Resolver plus the shared services it publishes to.
#[derive(Clone)]
pub struct Intake {
    /// Submission entry point.
    pub resolver: TorrentSourceResolver,
    /// Bus carrying `beforeadd`/`add` and failure events.
    pub events: EventBus,
    /// Submission counters.
    pub metrics: Metrics,
}

impl Intake {
    /// Validate `config` and build the bus, metrics and resolver without
    /// touching global state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a collaborator
    /// cannot be constructed.
    pub fn assemble(config: &IntakeConfig, backend: Arc<dyn IngestBackend>) -> IntakeResult<Self> {
        config
            .validate()
            .map_err(|err| IntakeError::config("config.validate", err))?;

        let events = EventBus::try_with_capacity(config.events.replay_capacity)
            .map_err(|err| IntakeError::events("events.bus", err))?;
        let metrics =
            Metrics::new().map_err(|err| IntakeError::telemetry("telemetry.metrics", err))?;
        let resolver = TorrentSourceResolver::new(backend, events.clone(), config.resolver.clone())
            .with_metrics(metrics.clone());

        Ok(Self {
            resolver,
            events,
            metrics,
        })
    }
}

/// Install logging from `config`, then assemble the resolver.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a global tracing
/// subscriber is already installed, or a collaborator cannot be constructed.
pub fn bootstrap(config: &IntakeConfig, backend: Arc<dyn IngestBackend>) -> IntakeResult<Intake> {
    config
        .validate()
        .map_err(|err| IntakeError::config("config.validate", err))?;

    let logging = LoggingConfig {
        level: &config.telemetry.log_level,
        format: log_format(config.telemetry.log_format),
        build_sha: build_sha(),
    };
    init_logging(&logging).map_err(|err| IntakeError::telemetry("telemetry.init", err))?;

    let intake = Intake::assemble(config, backend)?;
    info!(
        call_timeout_ms = config.resolver.call_timeout_ms,
        prefetch_timeout_ms = config.resolver.prefetch_timeout_ms,
        replay_capacity = config.events.replay_capacity,
        "intake resolver ready"
    );
    Ok(intake)
}

const fn log_format(setting: Option<LogFormatSetting>) -> LogFormat {
    match setting {
        Some(LogFormatSetting::Json) => LogFormat::Json,
        Some(LogFormatSetting::Pretty) => LogFormat::Pretty,
        None => LogFormat::infer(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_test_support::mocks::ScriptedBackend;

    #[test]
    fn explicit_log_format_wins_over_inference() {
        assert_eq!(log_format(Some(LogFormatSetting::Json)), LogFormat::Json);
        assert_eq!(log_format(Some(LogFormatSetting::Pretty)), LogFormat::Pretty);
        assert_eq!(log_format(None), LogFormat::infer());
    }

    #[test]
    fn assemble_rejects_invalid_config() {
        let mut config = IntakeConfig::default();
        config.events.replay_capacity = 0;
        let result = Intake::assemble(&config, Arc::new(ScriptedBackend::new()));
        assert!(matches!(result, Err(IntakeError::Config { .. })));
    }

    #[test]
    fn assemble_shares_bus_between_resolver_and_caller() {
        let intake = Intake::assemble(&IntakeConfig::default(), Arc::new(ScriptedBackend::new()))
            .expect("default config assembles");
        let _stream = intake.events.subscribe(None);
        assert_eq!(intake.resolver.events().subscriber_count(), 1);
        assert_eq!(intake.metrics.snapshot().in_flight, 0);
    }
}
