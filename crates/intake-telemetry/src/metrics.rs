//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes only the counters the submission flow reports.

use std::sync::Arc;

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    submissions_total: IntCounterVec,
    outcomes_total: IntCounterVec,
    magnet_winner_total: IntCounterVec,
    events_emitted_total: IntCounterVec,
    in_flight: IntGauge,
}

/// Snapshot of selected gauges and counters for health reporting.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Submissions currently awaiting a terminal outcome.
    pub in_flight: i64,
    /// Submissions that resolved.
    pub resolved_total: u64,
    /// Submissions that failed.
    pub failed_total: u64,
    /// Submissions that were cancelled.
    pub cancelled_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let submissions_total = counter_vec(
            "ingest_submissions_total",
            "Torrent sources submitted by classification",
            &["kind"],
        )?;
        let outcomes_total = counter_vec(
            "ingest_outcomes_total",
            "Terminal submission outcomes",
            &["outcome"],
        )?;
        let magnet_winner_total = counter_vec(
            "ingest_magnet_winner_total",
            "Magnet submissions resolved by each lookup path",
            &["path"],
        )?;
        let events_emitted_total = counter_vec(
            "events_emitted_total",
            "Domain events emitted by type",
            &["type"],
        )?;
        let in_flight = IntGauge::with_opts(Opts::new(
            "ingest_in_flight",
            "Submissions awaiting a terminal outcome",
        ))
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "ingest_in_flight",
            source,
        })?;

        register(&registry, "ingest_submissions_total", &submissions_total)?;
        register(&registry, "ingest_outcomes_total", &outcomes_total)?;
        register(&registry, "ingest_magnet_winner_total", &magnet_winner_total)?;
        register(&registry, "events_emitted_total", &events_emitted_total)?;
        register(&registry, "ingest_in_flight", &in_flight)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                submissions_total,
                outcomes_total,
                magnet_winner_total,
                events_emitted_total,
                in_flight,
            }),
        })
    }

    /// Record a submission and mark it in flight.
    pub fn inc_submission(&self, kind: &str) {
        self.inner
            .submissions_total
            .with_label_values(&[kind])
            .inc();
        self.inner.in_flight.inc();
    }

    /// Record a terminal outcome (`resolved`, `failed`, `cancelled`) and clear the in-flight mark.
    pub fn inc_outcome(&self, outcome: &str) {
        self.inner.outcomes_total.with_label_values(&[outcome]).inc();
        self.inner.in_flight.dec();
    }

    /// Record which magnet lookup path won the race.
    pub fn inc_magnet_winner(&self, path: &str) {
        self.inner
            .magnet_winner_total
            .with_label_values(&[path])
            .inc();
    }

    /// Increment the emitted event counter for the specific event type.
    pub fn inc_event(&self, event_type: &str) {
        self.inner
            .events_emitted_total
            .with_label_values(&[event_type])
            .inc();
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Take a point-in-time snapshot of the most relevant gauges and counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let outcome = |label: &str| self.inner.outcomes_total.with_label_values(&[label]).get();
        MetricsSnapshot {
            in_flight: self.inner.in_flight.get(),
            resolved_total: outcome("resolved"),
            failed_total: outcome("failed"),
            cancelled_total: outcome("cancelled"),
        }
    }
}

fn counter_vec(name: &'static str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
    IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| TelemetryError::MetricsCollector { name, source })
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::MetricsRegister { name, source })
}
