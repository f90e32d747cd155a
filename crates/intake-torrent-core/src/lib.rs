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

//! Engine-agnostic submission types, source classification, and the backend
//! contract the resolver drives.
//!
//! Layout: `model/` (DTOs), `source.rs` (magnet vs. direct classification),
//! `magnet.rs` (magnet URI parsing), `service/` (backend trait), `error.rs`.

pub mod error;
pub mod magnet;
pub mod model;
pub mod service;
pub mod source;

pub use error::{BackendError, BackendResult, ResolveError, ResolveResult};
pub use magnet::MagnetLink;
pub use model::{
    BackendOperation, CorrelationId, FILENAME_FIELD, InfoHash, PrefetchedMetadata,
    SubmissionRequest, TorrentInfo, TorrentInfoQuery, TorrentKey, TorrentMetadata,
};
pub use service::IngestBackend;
pub use source::{SourceKind, TorrentSource, classify};
