//! Backend contract driven by the resolver.

use async_trait::async_trait;

use crate::error::BackendResult;
use crate::model::{PrefetchedMetadata, TorrentInfo, TorrentInfoQuery};

/// Ingestion backend reached over whatever transport the host application uses.
///
/// Every call answers with an explicit result so the resolver can always reach
/// a terminal outcome; implementations should not swallow failures.
#[async_trait]
pub trait IngestBackend: Send + Sync {
    /// Best-effort info object derived from the magnet URI itself.
    async fn get_magnet_info(&self, magnet: &str) -> BackendResult<TorrentInfo>;

    /// Fetch the torrent metadata from the swarm, returning the info-hash and
    /// the base64-encoded metadata (empty when the fetch gave up).
    async fn prefetch_magnet_metadata(&self, magnet: &str) -> BackendResult<PrefetchedMetadata>;

    /// Download a `.torrent` file, returning the backend-side filename/handle.
    async fn download_torrent_from_url(&self, url: &str, cookies: &str) -> BackendResult<String>;

    /// Describe a torrent from a downloaded file or raw metadata.
    async fn get_torrent_info(&self, query: TorrentInfoQuery) -> BackendResult<TorrentInfo>;
}
