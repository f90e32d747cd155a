//! Default values applied when a setting is not supplied.
//!
//! # Design
//! - Keep every default in one place so documentation and tests agree.
//! - The prefetch deadline mirrors the backend's own metadata fetch window.

/// Deadline for a single backend call, in milliseconds.
pub const CALL_TIMEOUT_MS: u64 = 60_000;
/// Deadline for `prefetch_magnet_metadata`, in milliseconds.
pub const PREFETCH_TIMEOUT_MS: u64 = 30_000;
/// Log level used when `RUST_LOG` is unset.
pub const LOG_LEVEL: &str = "info";
/// Replay ring size for the event bus.
pub const EVENT_REPLAY_CAPACITY: usize = 1_024;
