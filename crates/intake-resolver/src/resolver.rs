//! Submission entry point: classify, announce, resolve in the background, emit.
//!
//! # Design
//! - `beforeadd` is published before `submit` returns, so it always precedes
//!   the submission's terminal event on the bus.
//! - Each submission runs in its own task inside an `ingest` span and owns a
//!   cancellation token. The token is checked again before emitting, so a
//!   cancelled submission only ever publishes `add_cancelled`.
//! - Exactly one terminal event (`add`, `add_failed`, `add_cancelled`) per submission.
//!   A task torn down before it settles (panic or runtime shutdown) still
//!   publishes `add_failed` from a drop guard.

use std::sync::Arc;

use intake_config::ResolverConfig;
use intake_events::{Event, EventBus};
use intake_telemetry::Metrics;
use intake_torrent_core::{
    BackendOperation, CorrelationId, IngestBackend, MagnetLink, ResolveError, ResolveResult,
    SubmissionRequest, TorrentSource,
};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, warn};

use crate::context::SubmissionContext;
use crate::paths::{self, Resolved};
use crate::submission::{ResolveOutcome, Submission};

/// Accepts torrent sources and resolves them against an [`IngestBackend`].
#[derive(Clone)]
pub struct TorrentSourceResolver {
    backend: Arc<dyn IngestBackend>,
    events: EventBus,
    config: ResolverConfig,
    metrics: Option<Metrics>,
}

impl TorrentSourceResolver {
    /// Build a resolver publishing on `events`.
    #[must_use]
    pub fn new(backend: Arc<dyn IngestBackend>, events: EventBus, config: ResolverConfig) -> Self {
        Self {
            backend,
            events,
            config,
            metrics: None,
        }
    }

    /// Record submission counters into `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Bus the resolver publishes on.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// Deadlines applied to backend calls.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Accept a submission and start resolving it.
    ///
    /// `beforeadd` has been published by the time this returns; the terminal
    /// event follows asynchronously.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn submit(&self, request: SubmissionRequest) -> Submission {
        let correlation_id = CorrelationId::new();
        let raw_source = request.source().to_string();
        let source = request.into_source();
        let kind = source.kind();
        let magnet = match &source {
            TorrentSource::Magnet { uri } => MagnetLink::parse(uri),
            TorrentSource::Direct { .. } => None,
        };

        if let Some(metrics) = &self.metrics {
            metrics.inc_submission(kind.as_str());
        }
        info!(
            correlation_id = %correlation_id,
            source_kind = kind.as_str(),
            "submission accepted"
        );
        let span = info_span!(
            "ingest",
            correlation_id = %correlation_id,
            source_kind = kind.as_str(),
            magnet_info_hash = magnet.as_ref().and_then(|link| link.info_hash.as_deref()),
            trackers = magnet.as_ref().map(|link| link.trackers.len())
        );
        self.emit(Event::BeforeAdd {
            correlation_id: correlation_id.as_uuid(),
            source: raw_source,
            name_hint: magnet.and_then(|link| link.display_name),
        });

        let cancel = CancellationToken::new();
        let ctx = SubmissionContext::new(correlation_id, source, cancel.clone());
        let guard = TerminalGuard::arm(self.clone(), correlation_id);
        let worker = self.clone();
        let task = tokio::spawn(async move { worker.run(ctx, guard).await }.instrument(span));

        Submission::new(correlation_id, kind, cancel, task)
    }

    async fn run(self, ctx: SubmissionContext, mut guard: TerminalGuard) -> ResolveOutcome {
        let result = tokio::select! {
            biased;
            () = ctx.cancel.cancelled() => None,
            result = paths::resolve(self.backend.as_ref(), &self.config, &ctx) => Some(result),
        };

        let outcome = match result {
            Some(result) if !ctx.cancel.is_cancelled() => self.settle(result),
            _ => ResolveOutcome::Cancelled,
        };
        guard.disarm();
        self.finish(ctx.correlation_id, &outcome);
        outcome
    }

    fn settle(&self, result: ResolveResult<Resolved>) -> ResolveOutcome {
        match result {
            Ok(Resolved { metadata, path }) => {
                if let Some(metrics) = &self.metrics
                    && path != paths::ResolutionPath::Direct
                {
                    metrics.inc_magnet_winner(path.as_str());
                }
                info!(
                    torrent_id = %metadata.torrent_id,
                    name = metadata.name(),
                    path = path.as_str(),
                    "torrent resolved"
                );
                ResolveOutcome::Resolved(metadata)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    operation = err.operation().map(BackendOperation::as_str),
                    "torrent resolution failed"
                );
                ResolveOutcome::Failed(err)
            }
        }
    }

    fn finish(&self, correlation_id: CorrelationId, outcome: &ResolveOutcome) {
        let correlation_id = correlation_id.as_uuid();
        let event = match outcome {
            ResolveOutcome::Resolved(metadata) => Event::Add {
                correlation_id,
                torrent_id: metadata.torrent_id.to_string(),
                info: metadata.info.clone(),
            },
            ResolveOutcome::Failed(err) => Event::AddFailed {
                correlation_id,
                operation: err.operation().map(|op| op.as_str().to_string()),
                reason: err.to_string(),
            },
            ResolveOutcome::Cancelled => {
                info!("submission cancelled");
                Event::AddCancelled { correlation_id }
            }
        };
        self.emit(event);
        if let Some(metrics) = &self.metrics {
            metrics.inc_outcome(outcome.as_str());
        }
    }

    fn emit(&self, event: Event) {
        let kind = event.kind();
        self.events.publish(event);
        if let Some(metrics) = &self.metrics {
            metrics.inc_event(kind);
        }
    }
}

/// Settles a submission whose task is dropped before reaching `finish`.
struct TerminalGuard {
    resolver: TorrentSourceResolver,
    correlation_id: CorrelationId,
    armed: bool,
}

impl TerminalGuard {
    const fn arm(resolver: TorrentSourceResolver, correlation_id: CorrelationId) -> Self {
        Self {
            resolver,
            correlation_id,
            armed: true,
        }
    }

    const fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!(
            correlation_id = %self.correlation_id,
            "resolution task dropped before settling"
        );
        self.resolver.finish(
            self.correlation_id,
            &ResolveOutcome::Failed(ResolveError::TaskAborted),
        );
    }
}
