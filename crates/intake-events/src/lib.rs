#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

//! Event bus for torrent submissions.
//!
//! The bus carries the signals the add dialog listens for (`beforeadd`,
//! `add`, and the terminal failure/cancellation signals), stamps each event
//! with a sequential identifier, and keeps a bounded replay ring so late
//! subscribers can catch up from a known id.
//!
//! Layout: `payloads.rs` (event types and envelope), `routing.rs` (bus and
//! stream), `error.rs` (bus errors).

pub mod error;
pub mod payloads;
pub mod routing;

pub use error::{EventBusError, EventBusResult};
pub use payloads::{DEFAULT_REPLAY_CAPACITY, Event, EventEnvelope, EventId};
pub use routing::{EventBus, EventStream};
