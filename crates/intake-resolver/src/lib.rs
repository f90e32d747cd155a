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

//! Torrent source resolution for the add dialog.
//!
//! A submitted source is classified as a magnet link or a direct URL, a
//! `beforeadd` event is published, and the matching backend call sequence runs
//! in the background until exactly one of `add`, `add_failed` or
//! `add_cancelled` is published for it.
//!
//! Layout: `resolver.rs` (entry point and event emission), `paths.rs` (backend
//! call sequences), `race.rs` (first-success combinator), `submission.rs`
//! (caller handle and outcomes), `context.rs` (per-submission state),
//! `bootstrap.rs` (wiring from configuration), `error.rs` (bootstrap errors).

pub mod bootstrap;
mod context;
pub mod error;
mod paths;
mod race;
pub mod resolver;
pub mod submission;

pub use bootstrap::{Intake, bootstrap};
pub use error::{IntakeError, IntakeResult};
pub use resolver::TorrentSourceResolver;
pub use submission::{ResolveOutcome, Submission};
