//! Per-submission state handed to the resolution paths.

use intake_torrent_core::{CorrelationId, TorrentSource};
use tokio_util::sync::CancellationToken;

/// Everything a resolution path needs to know about the submission it serves.
#[derive(Debug, Clone)]
pub(crate) struct SubmissionContext {
    pub(crate) correlation_id: CorrelationId,
    pub(crate) source: TorrentSource,
    pub(crate) cancel: CancellationToken,
}

impl SubmissionContext {
    pub(crate) const fn new(
        correlation_id: CorrelationId,
        source: TorrentSource,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            correlation_id,
            source,
            cancel,
        }
    }
}
