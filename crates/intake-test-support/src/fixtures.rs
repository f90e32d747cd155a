//! Sample sources and payloads.

use base64::{Engine as _, engine::general_purpose};
use intake_torrent_core::{PrefetchedMetadata, TorrentInfo};
use serde_json::json;

/// Minimal magnet accepted by the classifier.
pub const MAGNET_URI: &str = "magnet:?xt=urn:btih:ABC123";
/// Magnet carrying a full-length hash, a display name and a tracker.
pub const NAMED_MAGNET_URI: &str = "magnet:?xt=urn:btih:0123456789abcdef0123456789abcdef01234567&dn=demo&tr=udp%3A%2F%2Ftracker.example%3A80";
/// Info-hash reported by prefetch fixtures.
pub const INFO_HASH: &str = "0123456789abcdef0123456789abcdef01234567";
/// Direct URL used across suites.
pub const DIRECT_URL: &str = "http://example.com/a.torrent";
/// Cookie string paired with [`DIRECT_URL`].
pub const COOKIES: &str = "sid=1";
/// Filename the backend reports after downloading [`DIRECT_URL`].
pub const DOWNLOADED_FILENAME: &str = "a.torrent";
/// Bencoded info dictionary used as prefetched metadata.
pub const RAW_METADATA: &[u8] = b"d6:lengthi1024e4:name4:demoe";

/// Info object shaped like the backend's `get_torrent_info` answer.
#[must_use]
pub fn sample_info(name: &str) -> TorrentInfo {
    let value = json!({
        "name": name,
        "info_hash": INFO_HASH,
        "files_tree": {"contents": {name: {"index": 0, "length": 1024, "type": "file"}}},
    });
    match value {
        serde_json::Value::Object(map) => map,
        _ => TorrentInfo::new(),
    }
}

/// Prefetch answer carrying `metadata` base64-encoded.
#[must_use]
pub fn prefetched(info_hash: &str, metadata: &[u8]) -> PrefetchedMetadata {
    PrefetchedMetadata {
        info_hash: info_hash.to_string(),
        metadata: general_purpose::STANDARD.encode(metadata),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_torrent_core::{SourceKind, classify};

    #[test]
    fn fixture_sources_classify_as_documented() {
        assert_eq!(classify(MAGNET_URI), SourceKind::Magnet);
        assert_eq!(classify(NAMED_MAGNET_URI), SourceKind::Magnet);
        assert_eq!(classify(DIRECT_URL), SourceKind::Direct);
    }

    #[test]
    fn prefetched_fixture_decodes_back() {
        let payload = prefetched(INFO_HASH, RAW_METADATA);
        assert_eq!(payload.decode().expect("decodes"), RAW_METADATA);
        assert_eq!(sample_info("demo")["name"], "demo");
    }
}
