//! Event payload types carried from the resolver to the add dialog.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Identifier assigned to each event published on the bus.
pub type EventId = u64;

/// Default buffer size for the in-memory replay ring.
pub const DEFAULT_REPLAY_CAPACITY: usize = 1_024;

/// Signals emitted over the lifetime of a single submission.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Submission was accepted and dispatched; fired before any backend reply.
    BeforeAdd {
        /// Identifier generated for the submission.
        correlation_id: Uuid,
        /// Raw source string as typed by the user.
        source: String,
        /// Display name parsed from a magnet `dn` parameter, when present.
        #[serde(default)]
        name_hint: Option<String>,
    },
    /// Submission resolved into a described torrent.
    Add {
        /// Identifier generated for the submission.
        correlation_id: Uuid,
        /// Resolved torrent id (correlation id or discovered info-hash).
        torrent_id: String,
        /// Backend info object stamped with `filename`.
        info: Map<String, Value>,
    },
    /// Submission failed; no `add` will follow.
    AddFailed {
        /// Identifier generated for the submission.
        correlation_id: Uuid,
        /// Backend operation at fault, when one can be named.
        operation: Option<String>,
        /// Human-readable failure description.
        reason: String,
    },
    /// Submission was cancelled before it resolved.
    AddCancelled {
        /// Identifier generated for the submission.
        correlation_id: Uuid,
    },
}

impl Event {
    /// Machine-friendly discriminator used for metrics and log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BeforeAdd { .. } => "beforeadd",
            Self::Add { .. } => "add",
            Self::AddFailed { .. } => "add_failed",
            Self::AddCancelled { .. } => "add_cancelled",
        }
    }

    /// Correlation id of the submission that produced the event.
    #[must_use]
    pub const fn correlation_id(&self) -> Uuid {
        match self {
            Self::BeforeAdd { correlation_id, .. }
            | Self::Add { correlation_id, .. }
            | Self::AddFailed { correlation_id, .. }
            | Self::AddCancelled { correlation_id } => *correlation_id,
        }
    }

    /// Whether this event ends its submission.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::BeforeAdd { .. })
    }
}

/// Metadata wrapper around events. Each envelope tracks the event id and emission timestamp.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct EventEnvelope {
    /// Monotonic identifier assigned to the wrapped event.
    pub id: EventId,
    /// Timestamp recording when the envelope was produced.
    pub timestamp: DateTime<Utc>,
    /// Wrapped event payload.
    pub event: Event,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_events(id: Uuid) -> Vec<Event> {
        vec![
            Event::BeforeAdd {
                correlation_id: id,
                source: "magnet:?xt=urn:btih:abc".into(),
                name_hint: None,
            },
            Event::Add {
                correlation_id: id,
                torrent_id: "abc".into(),
                info: Map::new(),
            },
            Event::AddFailed {
                correlation_id: id,
                operation: Some("get_torrent_info".into()),
                reason: "boom".into(),
            },
            Event::AddCancelled { correlation_id: id },
        ]
    }

    #[test]
    fn kinds_match_dialog_signal_names() {
        let kinds: Vec<_> = sample_events(Uuid::nil())
            .iter()
            .map(Event::kind)
            .collect();
        assert_eq!(kinds, ["beforeadd", "add", "add_failed", "add_cancelled"]);
    }

    #[test]
    fn only_beforeadd_is_non_terminal() {
        let id = Uuid::new_v4();
        for event in sample_events(id) {
            assert_eq!(event.correlation_id(), id);
            assert_eq!(event.is_terminal(), event.kind() != "beforeadd");
        }
    }

    #[test]
    fn add_serializes_with_type_tag() {
        let mut info = Map::new();
        info.insert("filename".into(), json!("a.torrent"));
        let event = Event::Add {
            correlation_id: Uuid::nil(),
            torrent_id: "t".into(),
            info,
        };
        let value = serde_json::to_value(&event).expect("serialize event");
        assert_eq!(value["type"], "add");
        assert_eq!(value["info"]["filename"], "a.torrent");
    }
}
