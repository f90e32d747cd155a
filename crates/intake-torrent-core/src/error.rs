//! Error types for backend calls and submission resolution.

use std::time::Duration;

use thiserror::Error;

use crate::model::BackendOperation;

/// Failure reported by a backend implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendError {
    /// Human-readable failure detail supplied by the backend.
    pub message: String,
}

impl BackendError {
    /// Build a backend error from any displayable message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Convenience alias for backend call results.
pub type BackendResult<T> = Result<T, BackendError>;

/// Terminal failure of a submission.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A backend call returned an error.
    #[error("{operation} failed: {source}")]
    Backend {
        /// Backend call that failed.
        operation: BackendOperation,
        /// Failure reported by the backend.
        #[source]
        source: BackendError,
    },
    /// A backend call did not answer within its deadline.
    #[error("{operation} timed out after {after:?}")]
    TimedOut {
        /// Backend call that timed out.
        operation: BackendOperation,
        /// Deadline that elapsed.
        after: Duration,
    },
    /// Prefetch succeeded but carried no usable metadata.
    #[error("prefetched metadata unavailable for {info_hash}: {reason}")]
    MetadataUnavailable {
        /// Info-hash reported alongside the metadata.
        info_hash: String,
        /// Why the metadata could not be used.
        reason: &'static str,
    },
    /// Prefetch reported a blank info-hash.
    #[error("invalid info-hash {value:?}")]
    InvalidInfoHash {
        /// Raw value reported by the backend.
        value: String,
    },
    /// Both magnet resolution paths failed.
    #[error("magnet resolution failed (primary: {primary}; prefetch: {prefetch})")]
    AllPathsFailed {
        /// Failure of the `get_magnet_info` path.
        primary: Box<ResolveError>,
        /// Failure of the prefetch path.
        prefetch: Box<ResolveError>,
    },
    /// The resolution task panicked or was aborted by the runtime.
    #[error("resolution task aborted")]
    TaskAborted,
}

impl ResolveError {
    /// Backend call at fault, when a single one can be named.
    #[must_use]
    pub const fn operation(&self) -> Option<BackendOperation> {
        match self {
            Self::Backend { operation, .. } | Self::TimedOut { operation, .. } => Some(*operation),
            Self::MetadataUnavailable { .. } | Self::InvalidInfoHash { .. } => {
                Some(BackendOperation::PrefetchMagnetMetadata)
            }
            Self::AllPathsFailed { .. } | Self::TaskAborted => None,
        }
    }

    /// Wrap a backend failure for the named operation.
    #[must_use]
    pub fn backend(operation: BackendOperation, source: BackendError) -> Self {
        Self::Backend { operation, source }
    }
}

/// Convenience alias for resolution results.
pub type ResolveResult<T> = Result<T, ResolveError>;
