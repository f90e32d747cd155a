//! Source classification: magnet link or fetchable URL.

use serde::{Deserialize, Serialize};

/// Scheme prefix a magnet source must start with.
pub const MAGNET_PREFIX: &str = "magnet:?";
/// Topic parameter identifying a `BitTorrent` info-hash.
pub const BTIH_TOPIC: &str = "xt=urn:btih";

/// Variant chosen for a raw source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Magnet link carrying a `BitTorrent` info-hash topic.
    Magnet,
    /// Anything else; handed to the backend as a URL to download.
    Direct,
}

impl SourceKind {
    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Magnet => "magnet",
            Self::Direct => "direct",
        }
    }
}

/// Classify a raw source string.
///
/// Total over all inputs: a string is a magnet only when it starts with
/// `magnet:?` and contains `xt=urn:btih`; everything else (including the empty
/// string) is direct and fails later at the backend if it is not fetchable.
#[must_use]
pub fn classify(source: &str) -> SourceKind {
    if source.starts_with(MAGNET_PREFIX) && source.contains(BTIH_TOPIC) {
        SourceKind::Magnet
    } else {
        SourceKind::Direct
    }
}

/// Classified source describing how the backend should fetch the torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TorrentSource {
    /// Magnet URI resolved through metadata lookups.
    Magnet {
        /// Magnet URI exactly as submitted.
        uri: String,
    },
    /// URL the backend downloads a `.torrent` file from.
    Direct {
        /// URL exactly as submitted.
        url: String,
        /// Cookie header value forwarded with the download (may be empty).
        cookies: String,
    },
}

impl TorrentSource {
    #[must_use]
    /// Convenience constructor for magnet-based sources.
    pub fn magnet(uri: impl Into<String>) -> Self {
        Self::Magnet { uri: uri.into() }
    }

    #[must_use]
    /// Convenience constructor for URL-based sources.
    pub fn direct(url: impl Into<String>, cookies: impl Into<String>) -> Self {
        Self::Direct {
            url: url.into(),
            cookies: cookies.into(),
        }
    }

    /// Variant discriminator.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::Magnet { .. } => SourceKind::Magnet,
            Self::Direct { .. } => SourceKind::Direct,
        }
    }
}
