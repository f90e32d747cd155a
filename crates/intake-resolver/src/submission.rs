//! Handle returned to the caller for each accepted submission.

use intake_torrent_core::{CorrelationId, ResolveError, SourceKind, TorrentMetadata};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Terminal state of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The backend described the torrent; an `add` event was published.
    Resolved(TorrentMetadata),
    /// Resolution failed; an `add_failed` event was published.
    Failed(ResolveError),
    /// The submission was cancelled first; an `add_cancelled` event was published.
    Cancelled,
}

impl ResolveOutcome {
    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resolved(_) => "resolved",
            Self::Failed(_) => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Resolved metadata, if any.
    #[must_use]
    pub const fn metadata(&self) -> Option<&TorrentMetadata> {
        match self {
            Self::Resolved(metadata) => Some(metadata),
            _ => None,
        }
    }

    /// Failure cause, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ResolveError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// In-flight submission.
///
/// Dropping the handle detaches the resolution task; it still runs to its
/// terminal event. Call [`Submission::cancel`] to stop it.
#[derive(Debug)]
pub struct Submission {
    correlation_id: CorrelationId,
    kind: SourceKind,
    cancel: CancellationToken,
    task: JoinHandle<ResolveOutcome>,
}

impl Submission {
    pub(crate) const fn new(
        correlation_id: CorrelationId,
        kind: SourceKind,
        cancel: CancellationToken,
        task: JoinHandle<ResolveOutcome>,
    ) -> Self {
        Self {
            correlation_id,
            kind,
            cancel,
            task,
        }
    }

    /// Identifier carried by every event of this submission.
    #[must_use]
    pub const fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    /// How the source was classified.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Request cancellation. Has no effect once a terminal event was published.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the terminal outcome.
    pub async fn outcome(self) -> ResolveOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    correlation_id = %self.correlation_id,
                    error = %err,
                    "resolution task aborted"
                );
                ResolveOutcome::Failed(ResolveError::TaskAborted)
            }
        }
    }
}
