//! Core submission types and DTOs shared across the workspace.

use std::fmt::{self, Display, Formatter};

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{ResolveError, ResolveResult};
use crate::source::{SourceKind, TorrentSource, classify};

/// Key under which the resolved filename is stamped into the info object.
pub const FILENAME_FIELD: &str = "filename";

/// Descriptive fields (name, size, files, trackers, ...) as returned by the backend.
pub type TorrentInfo = Map<String, Value>;

/// Identifier generated per submission to match asynchronous results back to
/// the request that triggered them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CorrelationId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<CorrelationId> for Uuid {
    fn from(value: CorrelationId) -> Self {
        value.0
    }
}

impl Display for CorrelationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Raw input collected by the add dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    source: String,
    #[serde(default)]
    cookies: String,
}

impl SubmissionRequest {
    /// Build a request from the source and cookie fields.
    #[must_use]
    pub fn new(source: impl Into<String>, cookies: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            cookies: cookies.into(),
        }
    }

    /// Build a request with an empty cookie string.
    #[must_use]
    pub fn without_cookies(source: impl Into<String>) -> Self {
        Self::new(source, String::new())
    }

    /// Source string exactly as submitted.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Consume the request into its classified source.
    #[must_use]
    pub fn into_source(self) -> TorrentSource {
        match classify(&self.source) {
            SourceKind::Magnet => TorrentSource::magnet(self.source),
            SourceKind::Direct => TorrentSource::direct(self.source, self.cookies),
        }
    }
}

/// Info-hash discovered by the prefetch call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InfoHash(String);

impl InfoHash {
    /// Accept a backend-reported info-hash as-is apart from surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidInfoHash`] when nothing but whitespace was reported.
    pub fn parse(value: &str) -> ResolveResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ResolveError::InvalidInfoHash {
                value: value.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Reported string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for InfoHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier the resolved torrent is announced under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TorrentKey {
    /// No info-hash was known up front; the submission id stands in.
    Correlation(CorrelationId),
    /// Info-hash discovered while prefetching magnet metadata.
    InfoHash(InfoHash),
}

impl Display for TorrentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correlation(id) => id.fmt(f),
            Self::InfoHash(hash) => hash.fmt(f),
        }
    }
}

/// Fully-described torrent produced by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentMetadata {
    /// Identifier the torrent is announced under.
    pub torrent_id: TorrentKey,
    /// Filename stamped into `info` (magnet URI or downloaded file handle).
    pub filename: String,
    /// Backend info object, including the stamped `filename` field.
    pub info: TorrentInfo,
}

impl TorrentMetadata {
    /// Stamp the backend info with `filename` and bind it to `torrent_id`.
    #[must_use]
    pub fn stamp(torrent_id: TorrentKey, filename: impl Into<String>, mut info: TorrentInfo) -> Self {
        let filename = filename.into();
        info.insert(FILENAME_FIELD.to_string(), Value::String(filename.clone()));
        Self {
            torrent_id,
            filename,
            info,
        }
    }

    /// Torrent display name, when the backend supplied one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.info.get("name").and_then(Value::as_str)
    }
}

/// Result of `prefetch_magnet_metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefetchedMetadata {
    /// Info-hash discovered for the magnet.
    pub info_hash: String,
    /// Base64 encoding of the bencoded info dictionary; empty when the backend
    /// gave up before the metadata arrived.
    pub metadata: String,
}

impl PrefetchedMetadata {
    /// Decode the metadata blob.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MetadataUnavailable`] when the blob is not valid
    /// base64 or decodes to nothing.
    pub fn decode(&self) -> ResolveResult<Vec<u8>> {
        let bytes = general_purpose::STANDARD
            .decode(self.metadata.trim())
            .map_err(|_| ResolveError::MetadataUnavailable {
                info_hash: self.info_hash.clone(),
                reason: "metadata is not valid base64",
            })?;
        if bytes.is_empty() {
            return Err(ResolveError::MetadataUnavailable {
                info_hash: self.info_hash.clone(),
                reason: "backend returned no metadata",
            });
        }
        Ok(bytes)
    }
}

/// Argument accepted by `get_torrent_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TorrentInfoQuery {
    /// Look up a `.torrent` file previously downloaded by the backend.
    File(String),
    /// Parse raw bencoded metadata bytes.
    Metadata(Vec<u8>),
}

/// Backend calls the resolver issues; used to label errors, logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendOperation {
    /// `get_magnet_info(magnet)`.
    GetMagnetInfo,
    /// `prefetch_magnet_metadata(magnet)`.
    PrefetchMagnetMetadata,
    /// `download_torrent_from_url(url, cookies)`.
    DownloadTorrentFromUrl,
    /// `get_torrent_info(query)`.
    GetTorrentInfo,
}

impl BackendOperation {
    /// Wire name of the backend call.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetMagnetInfo => "get_magnet_info",
            Self::PrefetchMagnetMetadata => "prefetch_magnet_metadata",
            Self::DownloadTorrentFromUrl => "download_torrent_from_url",
            Self::GetTorrentInfo => "get_torrent_info",
        }
    }
}

impl Display for BackendOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
