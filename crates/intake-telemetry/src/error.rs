//! Failures raised while installing logging or exporting ingest metrics.

use prometheus::Error as PrometheusError;
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised by telemetry helpers.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global tracing subscriber is already installed.
    #[error("tracing subscriber already installed")]
    SubscriberInstall {
        /// Underlying tracing subscriber error.
        #[source]
        source: TryInitError,
    },
    /// An ingest collector could not be built.
    #[error("invalid ingest metric {name}")]
    MetricsCollector {
        /// Metric name.
        name: &'static str,
        /// Underlying Prometheus error.
        #[source]
        source: PrometheusError,
    },
    /// An ingest collector could not be added to the registry.
    #[error("ingest metric {name} could not be registered")]
    MetricsRegister {
        /// Metric name.
        name: &'static str,
        /// Underlying Prometheus error.
        #[source]
        source: PrometheusError,
    },
    /// The registry could not be rendered in text exposition format.
    #[error("metrics exposition failed")]
    MetricsEncode {
        /// Underlying Prometheus error.
        #[source]
        source: PrometheusError,
    },
    /// The rendered exposition was not UTF-8.
    #[error("metrics exposition was not utf-8")]
    MetricsUtf8 {
        /// Underlying UTF-8 conversion error.
        #[source]
        source: std::string::FromUtf8Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use tracing_subscriber::util::SubscriberInitExt;

    fn second_init_error() -> TryInitError {
        let first = tracing_subscriber::registry().try_init();
        match (first, tracing_subscriber::registry().try_init()) {
            (Err(err), _) | (Ok(()), Err(err)) => err,
            (Ok(()), Ok(())) => panic!("second subscriber install unexpectedly succeeded"),
        }
    }

    #[test]
    fn subscriber_install_keeps_the_init_error() {
        let err = TelemetryError::SubscriberInstall {
            source: second_init_error(),
        };
        assert_eq!(err.to_string(), "tracing subscriber already installed");
        assert!(err.source().is_some());
    }

    #[test]
    fn metric_errors_name_the_collector() {
        let utf8_error = String::from_utf8(vec![0, 159]).expect_err("invalid utf-8");
        let cases = [
            (
                TelemetryError::MetricsCollector {
                    name: "ingest_submissions_total",
                    source: PrometheusError::Msg("bad label".to_string()),
                },
                "invalid ingest metric ingest_submissions_total",
            ),
            (
                TelemetryError::MetricsRegister {
                    name: "ingest_in_flight",
                    source: PrometheusError::AlreadyReg,
                },
                "ingest metric ingest_in_flight could not be registered",
            ),
            (
                TelemetryError::MetricsEncode {
                    source: PrometheusError::Msg("closed".to_string()),
                },
                "metrics exposition failed",
            ),
            (
                TelemetryError::MetricsUtf8 { source: utf8_error },
                "metrics exposition was not utf-8",
            ),
        ];

        for (err, message) in cases {
            assert_eq!(err.to_string(), message);
            assert!(err.source().is_some());
        }
    }
}
