//! Event bus routing helpers.

use crate::error::{EventBusError, EventBusResult};
use crate::payloads::{DEFAULT_REPLAY_CAPACITY, Event, EventEnvelope, EventId};
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tokio::sync::broadcast::Sender;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

/// Shared event bus built on top of `tokio::broadcast`.
///
/// Publishing never blocks and never fails for lack of subscribers; when a
/// subscriber falls behind the channel capacity it skips the lagged events.
#[derive(Clone)]
pub struct EventBus {
    sender: Sender<EventEnvelope>,
    state: Arc<Mutex<BusState>>,
    replay_capacity: usize,
}

struct BusState {
    next_id: EventId,
    replay: VecDeque<EventEnvelope>,
}

impl EventBus {
    /// Construct a bus with a custom replay capacity.
    ///
    /// # Panics
    ///
    /// Panics if `replay_capacity` is zero.
    #[must_use]
    pub fn with_capacity(replay_capacity: usize) -> Self {
        match Self::try_with_capacity(replay_capacity) {
            Ok(bus) => bus,
            Err(err) => panic!("{err}"),
        }
    }

    /// Construct a bus with a custom replay capacity, rejecting a zero capacity.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::InvalidCapacity`] when `replay_capacity` is zero.
    pub fn try_with_capacity(replay_capacity: usize) -> EventBusResult<Self> {
        if replay_capacity == 0 {
            return Err(EventBusError::InvalidCapacity {
                requested: replay_capacity,
            });
        }
        let (sender, _) = broadcast::channel(replay_capacity);
        Ok(Self {
            sender,
            state: Arc::new(Mutex::new(BusState {
                next_id: 1,
                replay: VecDeque::with_capacity(replay_capacity),
            })),
            replay_capacity,
        })
    }

    /// Construct a bus with the default replay capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REPLAY_CAPACITY)
    }

    /// Subscribe to the bus.
    ///
    /// When `last_event_id` is supplied, buffered events newer than that id are
    /// yielded first, followed by live events.
    #[must_use]
    pub fn subscribe(&self, last_event_id: Option<EventId>) -> EventStream {
        // Subscribe before reading the ring so nothing published in between is lost;
        // the stream drops live duplicates of replayed ids.
        let receiver = self.sender.subscribe();
        let backlog = last_event_id.map_or_else(VecDeque::new, |since| {
            self.lock_state()
                .replay
                .iter()
                .filter(|env| env.id > since)
                .cloned()
                .collect()
        });
        let high_water = backlog.back().map_or(0, |env: &EventEnvelope| env.id);
        EventStream {
            backlog,
            live: BroadcastStream::new(receiver),
            high_water,
        }
    }

    /// Publish a new event to all subscribers and return its id.
    pub fn publish(&self, event: Event) -> EventId {
        let mut state = self.lock_state();
        let id = state.next_id;
        state.next_id = state.next_id.saturating_add(1);
        let envelope = EventEnvelope {
            id,
            timestamp: Utc::now(),
            event,
        };
        if state.replay.len() == self.replay_capacity {
            let _ = state.replay.pop_front();
        }
        state.replay.push_back(envelope.clone());
        // Send under the lock so broadcast order matches id order.
        let _ = self.sender.send(envelope);
        id
    }

    /// Last event id observed in the replay buffer.
    #[must_use]
    pub fn last_event_id(&self) -> Option<EventId> {
        self.lock_state().replay.back().map(|env| env.id)
    }

    /// Collect a backlog of events emitted after the specified id.
    #[must_use]
    pub fn backlog_since(&self, id: EventId) -> Vec<EventEnvelope> {
        self.lock_state()
            .replay
            .iter()
            .filter(|env| env.id > id)
            .cloned()
            .collect()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn lock_state(&self) -> MutexGuard<'_, BusState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream wrapper that yields events from the replay backlog, then from the
/// live broadcast channel.
pub struct EventStream {
    backlog: VecDeque<EventEnvelope>,
    live: BroadcastStream<EventEnvelope>,
    high_water: EventId,
}

impl EventStream {
    /// Receive the next event; returns `None` once the bus is dropped.
    pub async fn next(&mut self) -> Option<EventEnvelope> {
        if let Some(envelope) = self.backlog.pop_front() {
            return Some(envelope);
        }

        loop {
            match self.live.next().await? {
                Ok(envelope) if envelope.id > self.high_water => {
                    self.high_water = envelope.id;
                    return Some(envelope);
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;
    use uuid::Uuid;

    fn before_add(source: &str) -> Event {
        Event::BeforeAdd {
            correlation_id: Uuid::new_v4(),
            source: source.into(),
            name_hint: None,
        }
    }

    #[tokio::test]
    async fn publish_assigns_sequential_ids_and_replays() {
        let bus = EventBus::with_capacity(4);
        let first = bus.publish(before_add("a"));
        let second = bus.publish(Event::AddCancelled {
            correlation_id: Uuid::nil(),
        });

        assert_eq!(second, first + 1);
        assert_eq!(bus.last_event_id(), Some(second));
        let backlog = bus.backlog_since(first);
        assert_eq!(backlog.len(), 1);
        assert_eq!(backlog[0].id, second);
    }

    #[tokio::test]
    async fn replay_ring_drops_oldest_events() {
        let bus = EventBus::with_capacity(2);
        for source in ["a", "b", "c"] {
            let _ = bus.publish(before_add(source));
        }
        let ids: Vec<_> = bus.backlog_since(0).iter().map(|env| env.id).collect();
        assert_eq!(ids, [2, 3]);
    }

    #[tokio::test]
    async fn subscribe_yields_backlog_then_live_without_duplicates() {
        let bus = EventBus::new();
        let first = bus.publish(before_add("a"));
        let second = bus.publish(before_add("b"));

        let mut stream = bus.subscribe(Some(first));
        let third = bus.publish(before_add("c"));

        let replayed = stream.next().await.expect("replayed event");
        assert_eq!(replayed.id, second);
        let live = timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("live event in time")
            .expect("live event");
        assert_eq!(live.id, third);
    }

    #[tokio::test]
    async fn publish_without_subscribers_still_buffers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
        let id = bus.publish(before_add("solo"));
        assert_eq!(bus.last_event_id(), Some(id));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            EventBus::try_with_capacity(0),
            Err(EventBusError::InvalidCapacity { requested: 0 })
        ));
    }

    #[tokio::test]
    async fn stream_ends_when_bus_dropped() {
        let bus = EventBus::new();
        let mut stream = bus.subscribe(None);
        drop(bus);
        assert!(stream.next().await.is_none());
    }
}
