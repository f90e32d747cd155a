//! Event collection helpers for asserting on a submission's lifecycle.

use std::time::Duration;

use intake_events::{Event, EventEnvelope, EventStream};
use tokio::time::{Instant, timeout_at};
use uuid::Uuid;

/// Collect events for `correlation_id` until its terminal event arrives.
///
/// Events for other submissions are skipped. Collection also stops when the
/// deadline passes or the bus closes, so callers should assert on the result.
pub async fn collect_until_terminal(
    stream: &mut EventStream,
    correlation_id: Uuid,
    within: Duration,
) -> Vec<EventEnvelope> {
    let deadline = Instant::now() + within;
    let mut collected = Vec::new();
    while let Ok(Some(envelope)) = timeout_at(deadline, stream.next()).await {
        if envelope.event.correlation_id() != correlation_id {
            continue;
        }
        let terminal = envelope.event.is_terminal();
        collected.push(envelope);
        if terminal {
            break;
        }
    }
    collected
}

/// Collect every event for `correlation_id` seen during `window`.
pub async fn collect_for(
    stream: &mut EventStream,
    correlation_id: Uuid,
    window: Duration,
) -> Vec<EventEnvelope> {
    let deadline = Instant::now() + window;
    let mut collected = Vec::new();
    while let Ok(Some(envelope)) = timeout_at(deadline, stream.next()).await {
        if envelope.event.correlation_id() == correlation_id {
            collected.push(envelope);
        }
    }
    collected
}

/// Event kinds in arrival order, for compact assertions.
#[must_use]
pub fn kinds(envelopes: &[EventEnvelope]) -> Vec<&'static str> {
    envelopes.iter().map(|envelope| envelope.event.kind()).collect()
}

/// The terminal event among `envelopes`.
///
/// # Panics
///
/// Panics unless exactly one terminal event is present.
#[must_use]
pub fn single_terminal(envelopes: &[EventEnvelope]) -> &Event {
    let mut terminals = envelopes
        .iter()
        .map(|envelope| &envelope.event)
        .filter(|event| event.is_terminal());
    let first = terminals
        .next()
        .unwrap_or_else(|| panic!("no terminal event in {:?}", kinds(envelopes)));
    assert!(
        terminals.next().is_none(),
        "more than one terminal event in {:?}",
        kinds(envelopes)
    );
    first
}
