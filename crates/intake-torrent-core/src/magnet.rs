//! Lightweight magnet URI inspection.
//!
//! Only the fields the add flow surfaces before the backend answers are
//! extracted: the `btih` topic, the display name and the tracker list.

use url::Url;

const BTIH_URN: &str = "urn:btih:";

/// Parsed view of a magnet URI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MagnetLink {
    /// Info-hash from the first `xt=urn:btih:` topic.
    pub info_hash: Option<String>,
    /// Display name from the `dn` parameter.
    pub display_name: Option<String>,
    /// Tracker URLs from `tr` parameters, in order of appearance.
    pub trackers: Vec<String>,
}

impl MagnetLink {
    /// Parse a magnet URI; returns `None` for anything that is not a `magnet:` URI.
    #[must_use]
    pub fn parse(uri: &str) -> Option<Self> {
        let parsed = Url::parse(uri).ok()?;
        if parsed.scheme() != "magnet" {
            return None;
        }

        let mut link = Self::default();
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "xt" if link.info_hash.is_none() => {
                    link.info_hash = value
                        .strip_prefix(BTIH_URN)
                        .filter(|hash| !hash.is_empty())
                        .map(str::to_ascii_lowercase);
                }
                "dn" if link.display_name.is_none() && !value.trim().is_empty() => {
                    link.display_name = Some(value.trim().to_string());
                }
                "tr" if !value.is_empty() => link.trackers.push(value.into_owned()),
                _ => {}
            }
        }
        Some(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_topic_name_and_trackers() {
        let link = MagnetLink::parse(
            "magnet:?xt=urn:btih:0123456789ABCDEF0123456789ABCDEF01234567&dn=Ubuntu+24.04\
             &tr=udp%3A%2F%2Ftracker.example%3A80&tr=http%3A%2F%2Fbackup.example%2Fannounce",
        )
        .expect("magnet parses");
        assert_eq!(
            link.info_hash.as_deref(),
            Some("0123456789abcdef0123456789abcdef01234567")
        );
        assert_eq!(link.display_name.as_deref(), Some("Ubuntu 24.04"));
        assert_eq!(
            link.trackers,
            ["udp://tracker.example:80", "http://backup.example/announce"]
        );
    }

    #[test]
    fn missing_fields_stay_empty() {
        let link = MagnetLink::parse("magnet:?xt=urn:sha1:abc").expect("magnet parses");
        assert_eq!(link, MagnetLink::default());
    }

    #[test]
    fn rejects_non_magnet_uris() {
        assert!(MagnetLink::parse("http://example.com/a.torrent").is_none());
        assert!(MagnetLink::parse("not a uri").is_none());
    }
}
