//! Event bus error primitives.

use std::fmt::{self, Display, Formatter};

/// Error emitted when the event bus cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventBusError {
    /// Replay/broadcast capacity must be positive.
    InvalidCapacity {
        /// Capacity requested by the caller.
        requested: usize,
    },
}

impl Display for EventBusError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity { .. } => formatter.write_str("event bus capacity must be positive"),
        }
    }
}

impl std::error::Error for EventBusError {}

/// Result wrapper for event bus operations.
pub type EventBusResult<T> = Result<T, EventBusError>;
